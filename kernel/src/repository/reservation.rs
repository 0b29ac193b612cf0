use crate::model::{
    id::ReservationId,
    reservation::{
        event::{CreateReservation, UpdateReservationStatus},
        Reservation,
    },
    snapshot::DateRange,
    space::SpaceSelector,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    // 指定期間・スペースの予約を状態に関係なく取得する（エンジンに渡すスナップショットの元）
    async fn find_in_range(
        &self,
        range: DateRange,
        space: SpaceSelector,
    ) -> AppResult<Vec<Reservation>>;
    // 予約 ID から予約を取得する
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Reservation>;
    // 空き確認と登録を 1 つのトランザクションで行い、作成した予約 ID を返す
    // 全スペース予約の場合はスペースの数だけ ID が返る
    async fn create(&self, event: CreateReservation) -> AppResult<Vec<ReservationId>>;
    // 予約状態を遷移させる。遷移ルールに反する場合はエラーになる
    async fn update_status(&self, event: UpdateReservationStatus) -> AppResult<Reservation>;
}
