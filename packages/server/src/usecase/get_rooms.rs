//! UseCase: ルーム一覧・詳細の取得
//!
//! HTTP の観測用エンドポイントから呼ばれる読み取り専用の処理。
//! ルームハブ経由で呼ばれるため、参加・切断処理の途中の状態は見えません。

use crate::domain::{Room, RoomId};

use super::{GetRoomDetailError, RoomManager};

impl RoomManager {
    /// 全てのルームのスナップショットを取得（ルーム ID 順）
    pub fn get_rooms(&self) -> Vec<Room> {
        self.repository.get_rooms()
    }

    /// ルームのスナップショットを取得
    pub fn get_room_detail(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        RoomId::new(room_id.clone())
            .ok()
            .and_then(|id| self.repository.get(&id).cloned())
            .ok_or(GetRoomDetailError::RoomNotFound(room_id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{CREATED_AT, TestClient, create_manager};
    use super::*;

    #[tokio::test]
    async fn test_get_rooms_lists_every_room_in_id_order() {
        // テスト項目: 作成済みのルームが ID 順で取得でき、空のルームも含まれる
        // given (前提条件):
        let mut manager = create_manager();
        let alice = TestClient::connect(&mut manager);
        manager
            .join_room(alice.id, "zeta".to_string(), "Alice".to_string())
            .unwrap();
        manager
            .join_room(alice.id, "alpha".to_string(), "Alice".to_string())
            .unwrap();
        manager.disconnect_participant(alice.id);

        // when (操作):
        let rooms = manager.get_rooms();

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id().as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
        assert!(rooms.iter().all(|r| r.participants().is_empty()));
        assert!(rooms.iter().all(|r| r.created_at().value() == CREATED_AT));
    }

    #[tokio::test]
    async fn test_get_room_detail() {
        // テスト項目: 既存のルームは取得でき、未作成・空の ID は RoomNotFound になる
        // given (前提条件):
        let mut manager = create_manager();
        let alice = TestClient::connect(&mut manager);
        manager
            .join_room(alice.id, "r1".to_string(), "Alice".to_string())
            .unwrap();

        // when (操作):
        let found = manager.get_room_detail("r1".to_string());
        let missing = manager.get_room_detail("r2".to_string());
        let empty = manager.get_room_detail(String::new());

        // then (期待する結果):
        assert_eq!(found.map(|r| r.participants().len()), Ok(1));
        assert_eq!(
            missing.map(|r| r.participants().len()),
            Err(GetRoomDetailError::RoomNotFound("r2".to_string()))
        );
        assert!(matches!(empty, Err(GetRoomDetailError::RoomNotFound(id)) if id.is_empty()));
    }
}
