use crate::model::{
    slot::{BookingDuration, SlotCalendar, TimeSlot},
    snapshot::{ReservationSnapshot, SlotMap},
    space::{Space, SpaceSelector},
};
use chrono::{NaiveDate, NaiveTime};
use derive_new::new;
use std::collections::BTreeSet;

/// Fixed reason for single-space conflicts. It never says who holds the slot.
pub const ALREADY_BOOKED: &str = "The requested time slot is already booked.";

#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub space: SpaceSelector,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration: BookingDuration,
}

/// Spaces that block one requested slot of an all-spaces query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedSlot {
    pub slot: TimeSlot,
    pub spaces: Vec<Space>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityVerdict {
    pub available: bool,
    pub requested_slots: Vec<TimeSlot>,
    pub occupied_slots: Vec<TimeSlot>,
    pub conflicting_slots: Vec<TimeSlot>,
    pub reason: Option<String>,
    pub blocked_by: Vec<BlockedSlot>,
}

impl AvailabilityVerdict {
    /// A verdict for a request that fails before any slot is looked at,
    /// e.g. outside operating hours or with an unusable duration.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            requested_slots: Vec::new(),
            occupied_slots: Vec::new(),
            conflicting_slots: Vec::new(),
            reason: Some(reason.into()),
            blocked_by: Vec::new(),
        }
    }
}

/// Decides whether `query` can be granted against `snapshot`.
///
/// Calendar violations come back as an unavailable verdict with the
/// calendar's message, not as an error. Every slot list in the result is in
/// ascending order, whatever order the snapshot was loaded in.
pub fn check_availability(
    calendar: &SlotCalendar,
    query: &AvailabilityQuery,
    snapshot: &ReservationSnapshot,
) -> AvailabilityVerdict {
    let requested_slots = match calendar.request_slots(query.start_time, query.duration) {
        Ok(slots) => slots,
        Err(e) => return AvailabilityVerdict::rejected(e.to_string()),
    };

    let slot_map = snapshot.slot_map(query.date, query.space);
    match query.space {
        SpaceSelector::Single(_) => single_space_verdict(requested_slots, &slot_map),
        SpaceSelector::All => all_spaces_verdict(requested_slots, &slot_map),
    }
}

fn single_space_verdict(requested_slots: Vec<TimeSlot>, slot_map: &SlotMap) -> AvailabilityVerdict {
    let occupied_slots: Vec<TimeSlot> = slot_map.keys().copied().collect();
    let conflicting_slots: Vec<TimeSlot> = requested_slots
        .iter()
        .filter(|slot| slot_map.contains_key(*slot))
        .copied()
        .collect();
    let available = conflicting_slots.is_empty();

    AvailabilityVerdict {
        available,
        requested_slots,
        occupied_slots,
        conflicting_slots,
        reason: (!available).then(|| ALREADY_BOOKED.to_string()),
        blocked_by: Vec::new(),
    }
}

// 全スペース予約は、要求された全ての枠で全スペースが空いている場合のみ可能
fn all_spaces_verdict(requested_slots: Vec<TimeSlot>, slot_map: &SlotMap) -> AvailabilityVerdict {
    let occupied_slots: Vec<TimeSlot> = slot_map.keys().copied().collect();
    let blocked_by: Vec<BlockedSlot> = requested_slots
        .iter()
        .filter_map(|slot| {
            slot_map
                .get(slot)
                .filter(|spaces| !spaces.is_empty())
                .map(|spaces| BlockedSlot {
                    slot: *slot,
                    spaces: spaces.iter().copied().collect(),
                })
        })
        .collect();
    let conflicting_slots: Vec<TimeSlot> = blocked_by.iter().map(|b| b.slot).collect();
    let available = blocked_by.is_empty();

    let reason = (!available).then(|| {
        let spaces: BTreeSet<Space> = blocked_by
            .iter()
            .flat_map(|b| b.spaces.iter().copied())
            .collect();
        let names: Vec<&str> = spaces.iter().map(|s| s.as_ref()).collect();
        format!(
            "The whole studio is not free at the requested time; already booked: {}.",
            names.join(", ")
        )
    });

    AvailabilityVerdict {
        available,
        requested_slots,
        occupied_slots,
        conflicting_slots,
        reason,
        blocked_by,
    }
}
