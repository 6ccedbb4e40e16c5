//! Repository trait 定義
//!
//! ドメイン層が必要とするルームストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ルームストアはルームハブのタスクが単独で所有するため、
//! メソッドは `&mut self` による排他アクセスで、内部にロックを持ちません。

use super::{ConnectionId, Participant, RepositoryError, Room, RoomId};

/// Room Repository trait
///
/// ルームの生存期間を管理する唯一の所有者。ルームは初回参加時に作成され、
/// 削除するメソッドは存在しない。
pub trait RoomRepository: Send {
    /// ルームを取得し、存在しなければ空のルームを作成して返す
    fn get_or_create(&mut self, room_id: &RoomId) -> &mut Room;

    /// ルームを取得
    fn get(&self, room_id: &RoomId) -> Option<&Room>;

    /// 接続 ID が一致する参加者を全て削除し、削除した参加者を返す（存在しなければ空）
    fn remove_participant(
        &mut self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Vec<Participant>;

    /// 共有バッファを上書き
    fn set_code(&mut self, room_id: &RoomId, code: String) -> Result<(), RepositoryError>;

    /// 全てのルーム ID を取得（切断時の全件走査用）
    fn all_room_ids(&self) -> Vec<RoomId>;

    /// 全てのルームのスナップショットを取得
    fn get_rooms(&self) -> Vec<Room>;
}
