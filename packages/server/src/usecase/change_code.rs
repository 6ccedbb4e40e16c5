//! UseCase: 共有バッファ更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RoomManager::change_code() メソッド
//! - バッファの上書きと、送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：送信者には `codeUpdate` が返らない
//! - 一度も参加されていないルームへの更新が無視されることを保証
//! - 後から参加したメンバーが最新のバッファを受け取ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：バッファ更新とブロードキャスト
//! - 異常系：未作成のルーム、空のルーム ID
//! - エッジケース：送信者のみが購読している場合（ブロードキャスト対象なし）

use crate::domain::{ConnectionId, RoomId, ServerEvent};

use super::{ChangeCodeError, RoomManager};

impl RoomManager {
    /// 共有バッファの更新を実行
    ///
    /// 最後の書き込みが勝つ（競合解決は行わない）。
    ///
    /// # Arguments
    ///
    /// * `sender` - 更新を送ってきた接続の ID
    /// * `room_id` - 対象のルーム ID
    /// * `code` - 新しいバッファの内容
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - `codeUpdate` が届いた接続数
    /// * `Err(ChangeCodeError)` - ルームが未作成（何も送信されない）
    pub fn change_code(
        &mut self,
        sender: ConnectionId,
        room_id: String,
        code: String,
    ) -> Result<usize, ChangeCodeError> {
        let room_id = RoomId::new(room_id)
            .map_err(|_| ChangeCodeError::RoomNotFound(String::new()))?;

        // 1. Repository 経由でバッファを上書き（未作成のルームならエラー）
        self.repository
            .set_code(&room_id, code.clone())
            .map_err(|_| ChangeCodeError::RoomNotFound(room_id.as_str().to_string()))?;

        // 2. 送信者以外の購読者にブロードキャスト
        let delivered = self.message_pusher.broadcast_to_others(
            &sender,
            &room_id,
            &ServerEvent::CodeUpdate(code),
        );

        tracing::debug!(
            "Code in room '{}' updated by '{}', relayed to {} connection(s)",
            room_id,
            sender,
            delivered
        );
        Ok(delivered)
    }
}
