//! クライアントへ送信するイベント
//!
//! 送信イベントは閉じた列挙型で表現し、イベント名の打ち間違いをコンパイル時に防ぎます。
//! ワイヤ形式（JSON）への変換は Infrastructure 層の DTO が担当します。

use std::collections::BTreeMap;

use super::{
    entity::{Participant, Profile, Room},
    value_object::ConnectionId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// 参加順のロスター全体
    UpdateRoom(Vec<Participant>),
    /// 接続 ID → プロフィールのマップ全体
    UpdateProfiles(BTreeMap<ConnectionId, Profile>),
    /// 共有バッファの内容
    CodeUpdate(String),
}

impl ServerEvent {
    pub fn update_room(room: &Room) -> Self {
        Self::UpdateRoom(room.participants().to_vec())
    }

    pub fn update_profiles(room: &Room) -> Self {
        Self::UpdateProfiles(room.profiles().clone())
    }

    pub fn code_update(room: &Room) -> Self {
        Self::CodeUpdate(room.code().to_string())
    }

    /// ログ出力用のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            Self::UpdateRoom(_) => "updateRoom",
            Self::UpdateProfiles(_) => "updateProfiles",
            Self::CodeUpdate(_) => "codeUpdate",
        }
    }
}
