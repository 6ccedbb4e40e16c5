//! Shared application state handed to every handler.

use super::hub::RoomHubHandle;

/// Shared application state
///
/// Room state lives inside the hub task, so handlers only hold a handle to it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// RoomHub（ルーム状態を所有するタスク）へのハンドル
    pub hub: RoomHubHandle,
}
