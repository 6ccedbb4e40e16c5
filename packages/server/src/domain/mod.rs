//! ドメイン層
//!
//! - `value_object`: 接続 ID・ルーム ID・表示名・スロットなどの値オブジェクト
//! - `entity`: ルームと参加者
//! - `event`: クライアントへ送信するイベント
//! - `repository` / `message_pusher`: Infrastructure 層が実装するインターフェース

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Participant, Profile, Room};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::ServerEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, DisplayName, RoomId, Slot, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
