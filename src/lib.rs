//! Client-side slot-selection-and-booking workflow: a state machine that
//! fetches a day's interview slots, validates the booker's details, submits
//! the booking, and reconciles the outcome, with any transport behind the
//! [`SchedulingService`] trait.

pub mod controller;
pub mod error;
pub mod local_scheduling;
pub mod service;
#[cfg(test)]
pub mod testutils;
pub mod timefmt;
pub mod types;

pub use controller::{BookingController, Phase, ViewState};
pub use error::{SlotSelectError, SubmitError};
pub use local_scheduling::LocalScheduling;
pub use service::{SchedulingService, TransportError};
pub use types::{BookingRequest, BookingResult, Identity, Slot, SlotId, SlotStatus};
