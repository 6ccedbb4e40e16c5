//! UseCase: 接続処理
//!
//! WebSocket 接続が確立したときに送信チャンネルを登録します。
//! この時点ではどのルームにも参加していません（Unjoined）。

use crate::domain::{ConnectionId, PusherChannel};

use super::RoomManager;

impl RoomManager {
    /// 接続を登録
    ///
    /// # Arguments
    ///
    /// * `connection_id` - サーバーが払い出した接続 ID
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    pub fn connect_participant(&mut self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher.register_client(connection_id, sender);
        tracing::info!("Connection '{}' registered", connection_id);
    }
}
