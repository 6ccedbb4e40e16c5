//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RoomManager::join_room() メソッド
//! - 新規参加（ロスター追加、全員へのブロードキャスト、参加者へのバッファ送信）
//! - 同名での再参加（状態は変えず、参加者にだけ現在の状態を送る）
//!
//! ### なぜこのテストが必要か
//! - スロットが参加順に `(index mod 4) + 1` で割り当てられることを保証
//! - 再参加でロスターが重複せず、他のメンバーに通知されないことを確認
//! - 不正なペイロードで何も起きない（何も送らない）ことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加、複数人の参加
//! - エッジケース：同名の再参加（別の接続 ID でも無視される）、5 人目以降のスロット
//! - 異常系：ルーム ID / 表示名が空

use crate::domain::{ConnectionId, DisplayName, Participant, RoomId, ServerEvent};

use super::{JoinRoomError, RoomManager};

/// 参加処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// ロスターに追加された
    Joined(Participant),
    /// 同名の参加者が既にいたため、現在の状態を送るだけだった
    Rejoined,
}

impl RoomManager {
    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `room_id` - 参加先のルーム ID（空は不可）
    /// * `display_name` - 表示名（空は不可）
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 新規参加 / 再参加
    /// * `Err(JoinRoomError)` - ペイロード不正（何も送信されない）
    pub fn join_room(
        &mut self,
        connection_id: ConnectionId,
        room_id: String,
        display_name: String,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let room_id = RoomId::new(room_id)?;
        let display_name = DisplayName::new(display_name)?;

        // 1. ルームを取得（なければ作成）し、購読グループに加える
        self.repository.get_or_create(&room_id);
        self.message_pusher.subscribe(&room_id, connection_id);

        // 2. 同名の参加者がいなければロスターに追加
        let room = self.repository.get_or_create(&room_id);
        let joined = room.add_participant(connection_id, display_name.clone());
        let update_room = ServerEvent::update_room(room);
        let update_profiles = ServerEvent::update_profiles(room);
        let code_update = ServerEvent::code_update(room);

        match joined {
            Some(participant) => {
                // 3. ルーム全員（参加者本人を含む）にロスターとプロフィールを送る
                self.message_pusher
                    .broadcast_to_room(&room_id, &update_room);
                self.message_pusher
                    .broadcast_to_room(&room_id, &update_profiles);

                // 4. 参加者本人にだけ現在のバッファを送る
                self.push_or_log(&connection_id, &code_update);

                tracing::info!(
                    "'{}' joined room '{}' as slot {} (connection '{}')",
                    display_name,
                    room_id,
                    participant.slot.value(),
                    connection_id
                );
                Ok(JoinOutcome::Joined(participant))
            }
            None => {
                // 再参加: 状態は変えず、参加者本人にだけ現在の状態を送る
                for event in [&update_room, &update_profiles, &code_update] {
                    self.push_or_log(&connection_id, event);
                }

                tracing::info!(
                    "'{}' is already in room '{}', sent current state to connection '{}'",
                    display_name,
                    room_id,
                    connection_id
                );
                Ok(JoinOutcome::Rejoined)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{TestClient, create_manager};
    use super::*;
    use crate::{
        domain::{MockMessagePusher, ValueObjectError},
        infrastructure::{
            dto::websocket::{ParticipantInfo, ServerFrame},
            repository::InMemoryRoomRepository,
        },
    };

    fn roster_of(frames: &[ServerFrame]) -> Vec<ParticipantInfo> {
        frames
            .iter()
            .rev()
            .find_map(|frame| match frame {
                ServerFrame::UpdateRoom(roster) => Some(roster.clone()),
                _ => None,
            })
            .expect("updateRoom should have been received")
    }

    #[tokio::test]
    async fn test_join_room_first_participant() {
        // テスト項目: 最初の参加者はスロット 1 で追加され、ロスター・プロフィール・バッファを受け取る
        // given (前提条件):
        let mut manager = create_manager();
        let mut alice = TestClient::connect(&mut manager);

        // when (操作):
        let result = manager.join_room(alice.id, "r1".to_string(), "Alice".to_string());

        // then (期待する結果):
        let participant = match result {
            Ok(JoinOutcome::Joined(p)) => p,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(participant.slot.value(), 1);

        let frames = alice.drain();
        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames[0],
            ServerFrame::UpdateRoom(vec![ParticipantInfo {
                id: alice.id.to_string(),
                name: "Alice".to_string(),
                people_id: 1,
            }])
        );
        match &frames[1] {
            ServerFrame::UpdateProfiles(profiles) => {
                assert_eq!(profiles.len(), 1);
                assert_eq!(profiles[&alice.id.to_string()].name, "Alice");
                assert_eq!(profiles[&alice.id.to_string()].people_id, 1);
            }
            other => panic!("expected updateProfiles, got {:?}", other),
        }
        assert_eq!(frames[2], ServerFrame::CodeUpdate(String::new()));
    }

    #[tokio::test]
    async fn test_join_room_broadcasts_to_existing_members() {
        // テスト項目: 新規参加でルーム全員にロスターとプロフィールが届き、バッファは参加者本人だけに届く
        // given (前提条件):
        let mut manager = create_manager();
        let mut alice = TestClient::connect(&mut manager);
        let mut bob = TestClient::connect(&mut manager);
        manager
            .join_room(alice.id, "r1".to_string(), "Alice".to_string())
            .unwrap();
        alice.drain();

        // when (操作):
        manager
            .join_room(bob.id, "r1".to_string(), "Bob".to_string())
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            alice.drain_event_names(),
            vec!["updateRoom", "updateProfiles"]
        );
        let bob_frames = bob.drain();
        assert_eq!(bob_frames.len(), 3);
        assert!(matches!(bob_frames[2], ServerFrame::CodeUpdate(_)));

        let roster = roster_of(&bob_frames);
        let summary: Vec<(String, String, u8)> = roster
            .into_iter()
            .map(|p| (p.id, p.name, p.people_id))
            .collect();
        assert_eq!(
            summary,
            vec![
                (alice.id.to_string(), "Alice".to_string(), 1),
                (bob.id.to_string(), "Bob".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_join_room_slots_wrap_after_four() {
        // テスト項目: 異なる名前で参加するとロスター長は名前数と一致し、スロットは 4 で循環する
        // given (前提条件):
        let mut manager = create_manager();
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        let mut clients: Vec<TestClient> = names
            .iter()
            .map(|_| TestClient::connect(&mut manager))
            .collect();

        // when (操作):
        for (client, name) in clients.iter().zip(names) {
            manager
                .join_room(client.id, "r1".to_string(), name.to_string())
                .unwrap();
        }

        // then (期待する結果):
        let roster = roster_of(&clients[6].drain());
        assert_eq!(roster.len(), names.len());
        let slots: Vec<u8> = roster.iter().map(|p| p.people_id).collect();
        assert_eq!(slots, vec![1, 2, 3, 4, 1, 2, 3]);
        let order: Vec<&str> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, names);
    }

    #[tokio::test]
    async fn test_join_room_duplicate_name_from_other_connection_is_rejoin() {
        // テスト項目: 同名での参加は別の接続でも再参加扱いになり、ロスターは変わらず他のメンバーに通知されない
        // given (前提条件):
        let mut manager = create_manager();
        let mut alice = TestClient::connect(&mut manager);
        let mut impostor = TestClient::connect(&mut manager);
        manager
            .join_room(alice.id, "r1".to_string(), "Alice".to_string())
            .unwrap();
        manager
            .repository
            .set_code(&RoomId::new("r1".to_string()).unwrap(), "x=1".to_string())
            .unwrap();
        alice.drain();

        // when (操作):
        let result = manager.join_room(impostor.id, "r1".to_string(), "Alice".to_string());

        // then (期待する結果):
        assert_eq!(result, Ok(JoinOutcome::Rejoined));
        assert!(alice.drain().is_empty());

        let frames = impostor.drain();
        assert_eq!(frames.len(), 3);
        let roster = roster_of(&frames);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, alice.id.to_string());
        assert_eq!(frames[2], ServerFrame::CodeUpdate("x=1".to_string()));
    }

    #[tokio::test]
    async fn test_join_room_is_case_sensitive() {
        // テスト項目: 表示名の重複判定は大文字小文字を区別する
        // given (前提条件):
        let mut manager = create_manager();
        let alice = TestClient::connect(&mut manager);
        let lower = TestClient::connect(&mut manager);
        manager
            .join_room(alice.id, "r1".to_string(), "Alice".to_string())
            .unwrap();

        // when (操作):
        let result = manager.join_room(lower.id, "r1".to_string(), "alice".to_string());

        // then (期待する結果):
        assert!(matches!(result, Ok(JoinOutcome::Joined(p)) if p.slot.value() == 2));
    }

    #[tokio::test]
    async fn test_rejoined_connection_receives_later_room_broadcasts() {
        // テスト項目: 再参加扱いの接続も購読グループには加わり、以降のブロードキャストを受け取る
        // given (前提条件):
        let mut manager = create_manager();
        let alice = TestClient::connect(&mut manager);
        let mut second_tab = TestClient::connect(&mut manager);
        let bob = TestClient::connect(&mut manager);
        manager
            .join_room(alice.id, "r1".to_string(), "Alice".to_string())
            .unwrap();
        manager
            .join_room(second_tab.id, "r1".to_string(), "Alice".to_string())
            .unwrap();
        second_tab.drain();

        // when (操作):
        manager
            .join_room(bob.id, "r1".to_string(), "Bob".to_string())
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            second_tab.drain_event_names(),
            vec!["updateRoom", "updateProfiles"]
        );
    }

    #[tokio::test]
    async fn test_join_rooms_are_independent() {
        // テスト項目: 1 つの接続が複数のルームに参加でき、ルームごとに独立してスロットが決まる
        // given (前提条件):
        let mut manager = create_manager();
        let alice = TestClient::connect(&mut manager);
        let bob = TestClient::connect(&mut manager);
        manager
            .join_room(bob.id, "r1".to_string(), "Bob".to_string())
            .unwrap();

        // when (操作):
        let in_r1 = manager.join_room(alice.id, "r1".to_string(), "Alice".to_string());
        let in_r2 = manager.join_room(alice.id, "r2".to_string(), "Alice".to_string());

        // then (期待する結果):
        assert!(matches!(in_r1, Ok(JoinOutcome::Joined(p)) if p.slot.value() == 2));
        assert!(matches!(in_r2, Ok(JoinOutcome::Joined(p)) if p.slot.value() == 1));
        assert_eq!(manager.get_rooms().len(), 2);
    }

    #[test]
    fn test_join_room_with_empty_fields_sends_nothing() {
        // テスト項目: ルーム ID や表示名が空の場合は何も送信せず、ルームも作成しない
        // given (前提条件): 何か送信されたらモックが失敗する
        let mut pusher = MockMessagePusher::new();
        pusher.expect_subscribe().never();
        pusher.expect_push_to().never();
        pusher.expect_broadcast_to_room().never();
        let mut manager = RoomManager::new(Box::new(InMemoryRoomRepository::new()), Box::new(pusher));
        let connection_id = ConnectionId::generate();

        // when (操作):
        let empty_room = manager.join_room(connection_id, String::new(), "Alice".to_string());
        let empty_name = manager.join_room(connection_id, "r1".to_string(), String::new());

        // then (期待する結果):
        assert_eq!(
            empty_room,
            Err(JoinRoomError::InvalidPayload(ValueObjectError::RoomIdEmpty))
        );
        assert_eq!(
            empty_name,
            Err(JoinRoomError::InvalidPayload(
                ValueObjectError::DisplayNameEmpty
            ))
        );
        assert!(manager.get_rooms().is_empty());
    }

    #[test]
    fn test_join_room_issues_broadcasts_in_order() {
        // テスト項目: 新規参加では subscribe → ロスター → プロフィール → バッファの順で発行される
        // given (前提条件):
        let mut seq = mockall::Sequence::new();
        let mut pusher = MockMessagePusher::new();
        let connection_id = ConnectionId::generate();
        pusher
            .expect_subscribe()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| ());
        pusher
            .expect_broadcast_to_room()
            .withf(|_, event| matches!(event, ServerEvent::UpdateRoom(roster) if roster.len() == 1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| 1);
        pusher
            .expect_broadcast_to_room()
            .withf(|_, event| matches!(event, ServerEvent::UpdateProfiles(_)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| 1);
        pusher
            .expect_push_to()
            .withf(move |id, event| {
                *id == connection_id && matches!(event, ServerEvent::CodeUpdate(code) if code.is_empty())
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        let mut manager = RoomManager::new(Box::new(InMemoryRoomRepository::new()), Box::new(pusher));

        // when (操作):
        let result = manager.join_room(connection_id, "r1".to_string(), "Alice".to_string());

        // then (期待する結果): モックの期待値は drop 時に検証される
        assert!(matches!(result, Ok(JoinOutcome::Joined(_))));
    }

    #[tokio::test]
    async fn test_same_connection_joins_under_two_names() {
        // テスト項目: 同じ接続が別名で参加するとロスターには 2 件並び、プロフィールは 1 件に上書きされる
        // given (前提条件):
        let mut manager = create_manager();
        let mut alice = TestClient::connect(&mut manager);
        manager
            .join_room(alice.id, "r1".to_string(), "Alice".to_string())
            .unwrap();
        alice.drain();

        // when (操作):
        let result = manager.join_room(alice.id, "r1".to_string(), "Alice2".to_string());

        // then (期待する結果):
        assert!(matches!(result, Ok(JoinOutcome::Joined(p)) if p.slot.value() == 2));
        let room = manager.get_room_detail("r1".to_string()).unwrap();
        assert_eq!(room.participants().len(), 2);
        assert_eq!(room.profiles().len(), 1);
        assert_eq!(
            room.profiles()[&alice.id].display_name.as_str(),
            "Alice2"
        );
        assert_eq!(
            alice.drain_event_names(),
            vec!["updateRoom", "updateProfiles", "codeUpdate"]
        );
    }
}
