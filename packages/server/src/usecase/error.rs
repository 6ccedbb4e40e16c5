//! UseCase 層のエラー型定義
//!
//! いずれのエラーもクライアントには返さず、ルームハブでログに残すだけです。

use thiserror::Error;

use crate::domain::ValueObjectError;

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("invalid joinRoom payload: {0}")]
    InvalidPayload(#[from] ValueObjectError),
}

/// バッファ更新処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeCodeError {
    #[error("room '{0}' has not been created")]
    RoomNotFound(String),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}
