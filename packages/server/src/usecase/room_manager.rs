//! Room Manager: ルーム参加プロトコルの状態機械
//!
//! Room Manager はルームストア（`RoomRepository`）と送信口（`MessagePusher`）を
//! 単独で所有します。各ユースケース（参加・バッファ更新・切断など）は
//! 同じディレクトリの個別ファイルで `impl RoomManager` として実装されています。
//!
//! 全てのメソッドは同期的で、1 つのイベントの処理（ブロードキャストを含む）が
//! 完了するまで次のイベントは処理されません。直列化はルームハブが担います。

use crate::domain::{ConnectionId, MessagePusher, RoomRepository, ServerEvent};

/// ルーム参加プロトコルの状態機械
pub struct RoomManager {
    /// Repository（ルームストアの抽象化）
    pub(super) repository: Box<dyn RoomRepository>,
    /// MessagePusher（Broadcast Gateway の抽象化）
    pub(super) message_pusher: Box<dyn MessagePusher>,
}

impl RoomManager {
    /// 新しい RoomManager を作成
    pub fn new(
        repository: Box<dyn RoomRepository>,
        message_pusher: Box<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 特定の接続に送信し、失敗はログに残すだけにする
    pub(super) fn push_or_log(&self, connection_id: &ConnectionId, event: &ServerEvent) {
        if let Err(e) = self.message_pusher.push_to(connection_id, event) {
            tracing::warn!(
                "Failed to deliver '{}' to connection '{}': {}",
                event.name(),
                connection_id,
                e
            );
        }
    }
}
