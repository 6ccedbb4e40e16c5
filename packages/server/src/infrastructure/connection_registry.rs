//! 接続レジストリ
//!
//! 接続中のクライアント（接続 ID → 送信チャンネル）と、
//! ルームごとの購読グループ（ルーム ID → 接続 ID 列）を管理します。
//!
//! 購読グループはロスターとは独立しています。同名での再参加のようにロスターに
//! 追加されなかった接続も、参加を試みたルームのブロードキャストは受け取ります。

use std::collections::{BTreeMap, HashMap};

use crate::domain::{ConnectionId, PusherChannel, RoomId};

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// 接続 ID → 送信チャンネル
    connections: HashMap<ConnectionId, PusherChannel>,
    /// ルーム ID → 購読している接続 ID（購読順、重複なし）
    subscriptions: BTreeMap<RoomId, Vec<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, connection_id: ConnectionId, sender: PusherChannel) {
        if self.connections.insert(connection_id, sender).is_some() {
            tracing::warn!("Connection '{}' was already registered, replaced", connection_id);
        }
    }

    /// 接続を削除し、全ての購読グループから外す
    ///
    /// 購読していたルーム ID をルーム ID 順で返す。
    pub fn unregister(&mut self, connection_id: &ConnectionId) -> Vec<RoomId> {
        self.connections.remove(connection_id);

        let mut left = Vec::new();
        self.subscriptions.retain(|room_id, members| {
            let before = members.len();
            members.retain(|id| id != connection_id);
            if members.len() != before {
                left.push(room_id.clone());
            }
            !members.is_empty()
        });
        left
    }

    pub fn subscribe(&mut self, room_id: &RoomId, connection_id: ConnectionId) {
        let members = self.subscriptions.entry(room_id.clone()).or_default();
        if !members.contains(&connection_id) {
            members.push(connection_id);
        }
    }

    /// ルームの購読者（購読順）
    pub fn subscribers(&self, room_id: &RoomId) -> &[ConnectionId] {
        self.subscriptions
            .get(room_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn sender(&self, connection_id: &ConnectionId) -> Option<&PusherChannel> {
        self.connections.get(connection_id)
    }

    pub fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    pub fn count_connections(&self) -> usize {
        self.connections.len()
    }
}
