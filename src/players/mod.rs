//! Seat bookkeeping: which external participant sits where, and whether the
//! seat is human or automated.

pub mod registry;

pub use registry::{PlayerRegistry, SeatAssignment, SeatKind};
