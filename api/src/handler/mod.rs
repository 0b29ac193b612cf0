pub mod availability;
pub mod calendar;
pub mod health;
pub mod reservation;

#[cfg(test)]
pub(crate) mod fake;
