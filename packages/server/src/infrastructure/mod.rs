//! Infrastructure 層
//!
//! ドメイン層が定義するインターフェースの具体的な実装と、ワイヤ形式の DTO。

pub mod connection_registry;
pub mod dto;
pub mod message_pusher;
pub mod repository;
