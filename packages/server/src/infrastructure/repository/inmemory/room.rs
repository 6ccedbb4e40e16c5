//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! BTreeMap をインメモリのルームストアとして使用します。
//!
//! ルームは削除されず、プロセスの生存期間中は空になっても残ります。

use std::collections::BTreeMap;

use xor_relay_shared::time::{Clock, SystemClock};

use crate::domain::{
    ConnectionId, Participant, RepositoryError, Room, RoomId, RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// ルーム ID → ルーム
    rooms: BTreeMap<RoomId, Room>,
    /// ルーム作成時刻の取得元
    clock: Box<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// システム時刻を使う InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// 任意の Clock を使う InMemoryRoomRepository を作成
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            rooms: BTreeMap::new(),
            clock,
        }
    }

    pub fn count_rooms(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRepository for InMemoryRoomRepository {
    fn get_or_create(&mut self, room_id: &RoomId) -> &mut Room {
        let clock = &self.clock;
        self.rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!("Room '{}' created", room_id);
            Room::new(room_id.clone(), Timestamp::new(clock.now_jst_millis()))
        })
    }

    fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    fn remove_participant(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Vec<Participant> {
        self.rooms
            .get_mut(room_id)
            .map(|room| room.remove_participant(connection_id))
            .unwrap_or_default()
    }

    fn set_code(&mut self, room_id: &RoomId, code: String) -> Result<(), RepositoryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;
        room.set_code(code);
        Ok(())
    }

    fn all_room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }

    fn get_rooms(&self) -> Vec<Room> {
        self.rooms.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DisplayName;
    use xor_relay_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository のルームストア操作
    // - get_or_create の作成 / 既存ルーム返却
    // - 参加者削除・バッファ更新・全ルーム ID 取得
    //
    // 【なぜこのテストが必要か】
    // - ルームの生存期間（初回参加で作成、削除なし）を保証する必要がある
    // - 未作成ルームへのバッファ更新が失敗することを Room Manager が前提にしている
    //
    // 【どのようなシナリオをテストするか】
    // 1. 未知のルーム ID で空のルームが作成される
    // 2. 既存のルームは再作成されない
    // 3. 参加者削除（存在する / しない / ルームがない）
    // 4. バッファ更新（存在する / しないルーム）
    // 5. 全ルーム ID の取得
    // ========================================

    fn create_test_repository() -> InMemoryRoomRepository {
        InMemoryRoomRepository::with_clock(Box::new(FixedClock::new(1000)))
    }

    fn room_id(value: &str) -> RoomId {
        RoomId::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_get_or_create_creates_empty_room() {
        // テスト項目: 未知のルーム ID で空のルームが作成される
        // given (前提条件):
        let mut repo = create_test_repository();

        // when (操作):
        let room = repo.get_or_create(&room_id("r1"));

        // then (期待する結果):
        assert_eq!(room.id().as_str(), "r1");
        assert!(room.participants().is_empty());
        assert_eq!(room.code(), "");
        assert_eq!(room.created_at(), Timestamp::new(1000));
        assert_eq!(repo.count_rooms(), 1);
    }

    #[test]
    fn test_get_or_create_returns_existing_room() {
        // テスト項目: 既存のルームは再作成されず、状態が保持される
        // given (前提条件):
        let mut repo = create_test_repository();
        repo.get_or_create(&room_id("r1"))
            .set_code("x=1".to_string());

        // when (操作):
        let room = repo.get_or_create(&room_id("r1"));

        // then (期待する結果):
        assert_eq!(room.code(), "x=1");
        assert_eq!(repo.count_rooms(), 1);
    }

    #[test]
    fn test_get_unknown_room_is_none() {
        // テスト項目: 未作成のルームは取得できない
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let room = repo.get(&room_id("nope"));

        // then (期待する結果):
        assert!(room.is_none());
    }

    #[test]
    fn test_remove_participant() {
        // テスト項目: 参加者を接続 ID で削除できる（存在しなければ空）
        // given (前提条件):
        let mut repo = create_test_repository();
        let alice = ConnectionId::generate();
        repo.get_or_create(&room_id("r1"))
            .add_participant(alice, DisplayName::new("Alice".to_string()).unwrap())
            .unwrap();

        // when (操作):
        let removed = repo.remove_participant(&room_id("r1"), &alice);
        let removed_again = repo.remove_participant(&room_id("r1"), &alice);
        let removed_unknown_room = repo.remove_participant(&room_id("r2"), &alice);

        // then (期待する結果):
        let removed_ids: Vec<ConnectionId> = removed.iter().map(|p| p.connection_id).collect();
        assert_eq!(removed_ids, vec![alice]);
        assert!(removed_again.is_empty());
        assert!(removed_unknown_room.is_empty());
        // 空になってもルームは残る
        assert!(repo.get(&room_id("r1")).is_some());
    }

    #[test]
    fn test_set_code_on_existing_room() {
        // テスト項目: 既存ルームのバッファを上書きできる
        // given (前提条件):
        let mut repo = create_test_repository();
        repo.get_or_create(&room_id("r1"));

        // when (操作):
        let result = repo.set_code(&room_id("r1"), "fn main() {}".to_string());

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(repo.get(&room_id("r1")).unwrap().code(), "fn main() {}");
    }

    #[test]
    fn test_set_code_on_unknown_room_fails() {
        // テスト項目: 未作成のルームへのバッファ更新はエラーになり、ルームは作成されない
        // given (前提条件):
        let mut repo = create_test_repository();

        // when (操作):
        let result = repo.set_code(&room_id("r1"), "x".to_string());

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::RoomNotFound("r1".to_string()))
        );
        assert_eq!(repo.count_rooms(), 0);
    }

    #[test]
    fn test_all_room_ids() {
        // テスト項目: 全てのルーム ID を取得できる
        // given (前提条件):
        let mut repo = create_test_repository();
        repo.get_or_create(&room_id("b"));
        repo.get_or_create(&room_id("a"));

        // when (操作):
        let ids = repo.all_room_ids();

        // then (期待する結果):
        assert_eq!(ids, vec![room_id("a"), room_id("b")]);
        assert_eq!(repo.get_rooms().len(), 2);
    }
}
