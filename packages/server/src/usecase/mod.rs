//! UseCase 層
//!
//! `RoomManager` がルーム参加プロトコルの状態機械を担い、
//! ユースケースごとにファイルを分けて実装しています。

mod change_code;
mod connect_participant;
mod disconnect_participant;
mod error;
mod get_rooms;
mod join_room;
mod room_manager;

pub use error::{ChangeCodeError, GetRoomDetailError, JoinRoomError};
pub use join_room::JoinOutcome;
pub use room_manager::RoomManager;

#[cfg(test)]
use room_manager::test_helpers;
