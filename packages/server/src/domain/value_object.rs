//! 値オブジェクト定義
//!
//! 不変条件（空でない、範囲内など）はコンストラクタで検証し、
//! 生成後の値は常に妥当であることを型で保証します。

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Number of distinct participant slots (display hint only, not a capacity)
pub const SLOT_COUNT: u8 = 4;

/// 接続 ID
///
/// WebSocket 接続ごとにサーバーが払い出す一意な ID。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい接続 ID を払い出す
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ルーム ID
///
/// クライアントが任意に指定する文字列。空文字列は不可。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 表示名
///
/// 同一ルーム内での重複判定は大文字小文字を区別した完全一致。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参加者スロット（1〜4）
///
/// 参加時のロスター人数から導出される表示用のヒント。座席番号ではないため
/// 5 人目は再びスロット 1 になり、衝突は許容される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(u8);

impl Slot {
    pub fn new(value: u8) -> Result<Self, ValueObjectError> {
        if !(1..=SLOT_COUNT).contains(&value) {
            return Err(ValueObjectError::SlotOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// 現在のロスター人数からスロットを算出する: `(len mod 4) + 1`
    pub fn for_roster_len(roster_len: usize) -> Self {
        // 剰余は 0..4 に収まる
        Self((roster_len % SLOT_COUNT as usize) as u8 + 1)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
