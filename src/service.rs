use crate::types::{BookingRequest, BookingResult, Slot};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("server returned status {status}: {message}")]
    Http { status: u16, message: String },
}

/// The one collaborator the workflow controller depends on. Transports
/// (HTTP client, in-memory store) implement this; the controller never sees
/// endpoints or wire formats.
#[async_trait]
pub trait SchedulingService: Send + Sync + 'static {
    /// Lists the slots for one calendar day. An empty list is a normal
    /// result, never substituted with an error.
    async fn list_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, TransportError>;

    /// Submits a booking. A slot lost to another booker resolves as
    /// `BookingResult::Rejected`, not as a transport error.
    async fn book_slot(&self, request: &BookingRequest) -> Result<BookingResult, TransportError>;
}
