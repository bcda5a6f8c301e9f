use crate::types::SlotId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotSelectError {
    #[error("no slot list is open for selection")]
    NotReady,
    #[error("slot {0} is not in the current list")]
    UnknownSlot(SlotId),
    #[error("slot {0} is already booked")]
    AlreadyBooked(SlotId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("no slot is selected")]
    NoSelection,
    #[error("booking details are invalid: {}", reasons.join("; "))]
    Invalid { reasons: Vec<String> },
}
