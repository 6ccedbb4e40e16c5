//! エンティティ定義
//!
//! `Room` はロスター（参加順の参加者列）、プロフィールマップ、共有バッファを保持し、
//! 「プロフィールのキー集合 == ロスター内の接続 ID 集合」という不変条件を
//! 自身のメソッドでのみ更新することで守ります。

use std::collections::BTreeMap;

use super::value_object::{ConnectionId, DisplayName, RoomId, Slot, Timestamp};

/// ルーム参加者
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub slot: Slot,
}

impl Participant {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, slot: Slot) -> Self {
        Self {
            connection_id,
            display_name,
            slot,
        }
    }

    pub fn profile(&self) -> Profile {
        Profile {
            display_name: self.display_name.clone(),
            slot: self.slot,
        }
    }
}

/// 接続 ID ごとのプロフィール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub display_name: DisplayName,
    pub slot: Slot,
}

/// ルーム
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    participants: Vec<Participant>,
    profiles: BTreeMap<ConnectionId, Profile>,
    code: String,
    created_at: Timestamp,
}

impl Room {
    /// 空のロスターと空のバッファでルームを作成
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: Vec::new(),
            profiles: BTreeMap::new(),
            code: String::new(),
            created_at,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// 参加順のロスター
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn profiles(&self) -> &BTreeMap<ConnectionId, Profile> {
        &self.profiles
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn has_participant_named(&self, display_name: &DisplayName) -> bool {
        self.participants
            .iter()
            .any(|p| &p.display_name == display_name)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.profiles.contains_key(connection_id)
    }

    /// 参加者を末尾に追加
    ///
    /// 同名の参加者が既にいる場合は何もせず `None` を返す（接続 ID は問わない）。
    pub fn add_participant(
        &mut self,
        connection_id: ConnectionId,
        display_name: DisplayName,
    ) -> Option<Participant> {
        if self.has_participant_named(&display_name) {
            return None;
        }

        let slot = Slot::for_roster_len(self.participants.len());
        let participant = Participant::new(connection_id, display_name, slot);
        self.profiles.insert(connection_id, participant.profile());
        self.participants.push(participant.clone());

        Some(participant)
    }

    /// 接続 ID が一致する参加者を**全て**ロスターとプロフィールから削除
    ///
    /// 同じ接続が別名で複数回参加している場合もあるため、一致するエントリは全て取り除く。
    /// ロスターの順序は維持され、残りの参加者のスロットは振り直さない。
    ///
    /// # Returns
    ///
    /// 削除された参加者（ロスター順）。一致しなければ空
    pub fn remove_participant(&mut self, connection_id: &ConnectionId) -> Vec<Participant> {
        let (removed, remaining): (Vec<_>, Vec<_>) = self
            .participants
            .drain(..)
            .partition(|p| &p.connection_id == connection_id);
        self.participants = remaining;
        self.profiles.remove(connection_id);
        removed
    }

    pub fn set_code(&mut self, code: String) {
        self.code = code;
    }
}
