use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::{
    health::HealthCheckRepositoryImpl, reservation::ReservationRepositoryImpl,
};
use kernel::engine::occupancy::OccupancyPolicy;
use kernel::model::slot::SlotCalendar;
use kernel::repository::{health::HealthCheckRepository, reservation::ReservationRepository};

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    reservation_repository: Arc<dyn ReservationRepository>,
    slot_calendar: SlotCalendar,
    occupancy_policy: OccupancyPolicy,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        slot_calendar: SlotCalendar,
        occupancy_policy: OccupancyPolicy,
    ) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let reservation_repository =
            Arc::new(ReservationRepositoryImpl::new(pool.clone(), slot_calendar));
        Self::from_parts(
            health_check_repository,
            reservation_repository,
            slot_calendar,
            occupancy_policy,
        )
    }

    // データベースを使わずに組み立てる場合（テストなど）に使う
    pub fn from_parts(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
        slot_calendar: SlotCalendar,
        occupancy_policy: OccupancyPolicy,
    ) -> Self {
        Self {
            health_check_repository,
            reservation_repository,
            slot_calendar,
            occupancy_policy,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn reservation_repository(&self) -> Arc<dyn ReservationRepository> {
        self.reservation_repository.clone()
    }

    pub fn slot_calendar(&self) -> SlotCalendar {
        self.slot_calendar
    }

    pub fn occupancy_policy(&self) -> OccupancyPolicy {
        self.occupancy_policy
    }
}
