//! MessagePusher trait 定義
//!
//! 接続中のクライアントへイベントを届けるためのインターフェース（Broadcast Gateway）。
//! 接続の登録とルームの購読グループもここで管理します。
//!
//! 送信は fire-and-forget で、確認応答・バックプレッシャー・再送は行いません。
//! 同じ接続宛てのイベントは発行順に届きます（接続ごとに単一の FIFO チャンネル）。

use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RoomId, ServerEvent};

/// クライアントへの送信チャンネル（エンコード済みのフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
pub trait MessagePusher: Send {
    /// 接続を登録
    fn register_client(&mut self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除し、全ての購読グループから外す
    ///
    /// 購読していたルーム ID を返す。
    fn unregister_client(&mut self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// 接続をルームの購読グループに追加（既に購読済みなら何もしない）
    fn subscribe(&mut self, room_id: &RoomId, connection_id: ConnectionId);

    /// 特定の接続に送信
    fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;

    /// ルームの購読者全員（送信者を含む）に送信し、届いた件数を返す
    fn broadcast_to_room(&self, room_id: &RoomId, event: &ServerEvent) -> usize;

    /// ルームの購読者のうち送信者以外に送信し、届いた件数を返す
    fn broadcast_to_others(
        &self,
        sender: &ConnectionId,
        room_id: &RoomId,
        event: &ServerEvent,
    ) -> usize;
}
