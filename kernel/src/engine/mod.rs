//! The booking engine: pure functions over a [`ReservationSnapshot`].
//!
//! Callers that persist a booking based on a verdict must do the load,
//! the check and the write atomically for the affected date and spaces.
//! Nothing in here can provide that.
//!
//! [`ReservationSnapshot`]: crate::model::snapshot::ReservationSnapshot

pub mod availability;
pub mod occupancy;
