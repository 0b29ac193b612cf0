pub mod id;
pub mod reservation;
pub mod slot;
pub mod snapshot;
pub mod space;
