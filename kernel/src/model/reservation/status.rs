//! Reservation lifecycle.
//!
//! ```text
//! pending ──admin──▶ confirmed ──admin, after the session──▶ completed
//!    │                   │
//!    └──admin/customer───┴──admin/customer──▶ cancelled
//! ```
//!
//! The engine only reads statuses. Transitions are applied by the
//! persistence layer, which must run [`ReservationStatus::transition`]
//! before writing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// Statuses that hold their slots against other bookings. Conflict checks,
/// calendar aggregation and the database filter all read this one list.
pub const OCCUPYING_STATUSES: [ReservationStatus; 2] =
    [ReservationStatus::Pending, ReservationStatus::Confirmed];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Actor {
    Admin,
    Customer,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("a {from} reservation cannot become {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },
    #[error("a {actor} cannot mark a reservation as {to}")]
    NotPermitted {
        actor: Actor,
        to: ReservationStatus,
    },
    #[error("the session on {session_date} has not taken place yet")]
    SessionNotHeldYet { session_date: NaiveDate },
}

impl From<LifecycleError> for AppError {
    fn from(value: LifecycleError) -> Self {
        AppError::UnprocessableEntity(value.to_string())
    }
}

impl ReservationStatus {
    pub fn is_occupying(self) -> bool {
        OCCUPYING_STATUSES.contains(&self)
    }

    pub fn can_transition_to(self, to: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, to),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
        )
    }

    /// Checks `self -> to` for the given actor and returns the new status.
    ///
    /// `today` is the facility-local date the change is requested on; a
    /// reservation can only be completed once its session date has passed.
    pub fn transition(
        self,
        to: ReservationStatus,
        actor: Actor,
        session_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<ReservationStatus, LifecycleError> {
        if !self.can_transition_to(to) {
            return Err(LifecycleError::InvalidTransition { from: self, to });
        }
        let admin_only = matches!(to, ReservationStatus::Confirmed | ReservationStatus::Completed);
        if admin_only && actor != Actor::Admin {
            return Err(LifecycleError::NotPermitted { actor, to });
        }
        if to == ReservationStatus::Completed && session_date >= today {
            return Err(LifecycleError::SessionNotHeldYet { session_date });
        }
        Ok(to)
    }
}
