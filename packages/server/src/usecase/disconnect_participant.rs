//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RoomManager::disconnect_participant() メソッド
//! - 全ルームの走査、ロスターとプロフィールからの削除、残りのメンバーへの通知
//!
//! ### なぜこのテストが必要か
//! - 複数のルームに参加していた接続が、同じ処理で全て片付くことを保証
//! - 参加していないルームには何も送られないことを確認
//! - 残りの参加者のスロットが振り直されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：複数ルームに参加していた接続、最後の参加者の切断（通知対象なし）
//! - エッジケース：どのルームにも参加していない接続、購読だけしていた接続

use crate::domain::{ConnectionId, RoomId, ServerEvent};

use super::RoomManager;

impl RoomManager {
    /// 切断を実行
    ///
    /// 接続を全ての購読グループから外したうえで、ストア内の**全ての**ルームを走査し、
    /// この接続の参加者を削除します（O(ルーム数 × 平均ロスター長)）。
    ///
    /// # Returns
    ///
    /// ロスターから削除されたルームの ID リスト
    pub fn disconnect_participant(&mut self, connection_id: ConnectionId) -> Vec<RoomId> {
        // 1. 購読グループと送信チャンネルから外す
        let subscribed = self.message_pusher.unregister_client(&connection_id);

        // 2. 全てのルームを走査して参加者を削除
        let mut affected = Vec::new();
        for room_id in self.repository.all_room_ids() {
            let removed = self.repository.remove_participant(&room_id, &connection_id);
            if removed.is_empty() {
                continue;
            }
            let Some(room) = self.repository.get(&room_id) else {
                continue;
            };

            // 3. 残りのメンバーにロスターとプロフィールを送る
            let update_room = ServerEvent::update_room(room);
            let update_profiles = ServerEvent::update_profiles(room);
            self.message_pusher
                .broadcast_to_room(&room_id, &update_room);
            self.message_pusher
                .broadcast_to_room(&room_id, &update_profiles);

            for participant in &removed {
                tracing::info!("'{}' left room '{}'", participant.display_name, room_id);
            }
            affected.push(room_id);
        }

        tracing::info!(
            "Connection '{}' disconnected (subscribed to {} room(s), removed from {} roster(s))",
            connection_id,
            subscribed.len(),
            affected.len()
        );
        affected
    }
}
