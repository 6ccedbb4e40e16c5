//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続レジストリ（送信チャンネルとルーム購読グループ）の管理
//! - ドメインイベントの JSON フレームへのエンコード
//! - クライアントへの送信（push_to, broadcast_to_room, broadcast_to_others）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! ブロードキャストではイベントを 1 回だけエンコードし、各接続のチャンネルに積みます。

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomId, ServerEvent},
    infrastructure::{connection_registry::ConnectionRegistry, dto::conversion::encode_server_event},
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let mut pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id, tx);
/// pusher.subscribe(&room_id, connection_id);
/// pusher.broadcast_to_room(&room_id, &ServerEvent::CodeUpdate("x=1".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct WebSocketMessagePusher {
    registry: ConnectionRegistry,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// エンコード済みのフレームを対象に送る。部分的な失敗は許容し、届いた件数を返す
    fn fan_out<'a>(
        &self,
        targets: impl Iterator<Item = &'a ConnectionId>,
        event: &ServerEvent,
    ) -> usize {
        let frame = match encode_server_event(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to encode '{}' event: {}", event.name(), e);
                return 0;
            }
        };

        let mut delivered = 0;
        for target in targets {
            match self.registry.sender(target) {
                Some(sender) => {
                    if let Err(e) = sender.send(frame.clone()) {
                        tracing::warn!(
                            "Failed to push '{}' to connection '{}': {}",
                            event.name(),
                            target,
                            e
                        );
                    } else {
                        delivered += 1;
                    }
                }
                None => {
                    tracing::warn!(
                        "Connection '{}' not found during broadcast, skipping",
                        target
                    );
                }
            }
        }
        delivered
    }
}

impl MessagePusher for WebSocketMessagePusher {
    fn register_client(&mut self, connection_id: ConnectionId, sender: PusherChannel) {
        self.registry.register(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    fn unregister_client(&mut self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let left = self.registry.unregister(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher ({} room(s) left)",
            connection_id,
            left.len()
        );
        left
    }

    fn subscribe(&mut self, room_id: &RoomId, connection_id: ConnectionId) {
        self.registry.subscribe(room_id, connection_id);
        tracing::debug!("Connection '{}' subscribed to room '{}'", connection_id, room_id);
    }

    fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let sender = self
            .registry
            .sender(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        let frame =
            encode_server_event(event).map_err(|e| MessagePushError::EncodeFailed(e.to_string()))?;
        sender
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed '{}' to connection '{}'", event.name(), connection_id);
        Ok(())
    }

    fn broadcast_to_room(&self, room_id: &RoomId, event: &ServerEvent) -> usize {
        let delivered = self.fan_out(self.registry.subscribers(room_id).iter(), event);
        tracing::debug!(
            "Broadcasted '{}' to {} connection(s) in room '{}'",
            event.name(),
            delivered,
            room_id
        );
        delivered
    }

    fn broadcast_to_others(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        event: &ServerEvent,
    ) -> usize {
        let targets = self
            .registry
            .subscribers(room_id)
            .iter()
            .filter(|id| *id != sender);
        let delivered = self.fan_out(targets, event);
        tracing::debug!(
            "Broadcasted '{}' from '{}' to {} other connection(s) in room '{}'",
            event.name(),
            sender,
            delivered,
            room_id
        );
        delivered
    }
}
