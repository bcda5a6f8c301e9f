use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use crate::{
    service::{SchedulingService, TransportError},
    types::{BookingRequest, BookingResult, Slot},
};

pub struct MockSchedulingInner {
    pub success: AtomicBool,
    pub calls_to_list_slots: AtomicU64,
    pub calls_to_book_slot: AtomicU64,
    pub slots: Mutex<HashMap<NaiveDate, Vec<Slot>>>,
    pub booking_outcome: Mutex<Option<BookingResult>>,
    pub last_request: Mutex<Option<BookingRequest>>,
    pub list_gates: Mutex<HashMap<NaiveDate, Arc<Notify>>>,
    pub book_gate: Mutex<Option<Arc<Notify>>>,
}

#[derive(Clone)]
pub struct MockScheduling(pub Arc<MockSchedulingInner>);

impl MockSchedulingInner {
    fn new() -> Self {
        Self {
            success: AtomicBool::new(true),
            calls_to_list_slots: AtomicU64::default(),
            calls_to_book_slot: AtomicU64::default(),
            slots: Mutex::default(),
            booking_outcome: Mutex::default(),
            last_request: Mutex::default(),
            list_gates: Mutex::default(),
            book_gate: Mutex::default(),
        }
    }
}

impl MockScheduling {
    pub fn new() -> Self {
        Self(Arc::new(MockSchedulingInner::new()))
    }

    pub fn set_slots(&self, date: NaiveDate, slots: Vec<Slot>) {
        self.0.slots.lock().unwrap().insert(date, slots);
    }

    pub fn set_booking_outcome(&self, outcome: BookingResult) {
        *self.0.booking_outcome.lock().unwrap() = Some(outcome);
    }

    pub fn clear_booking_outcome(&self) {
        *self.0.booking_outcome.lock().unwrap() = None;
    }

    pub fn last_request(&self) -> Option<BookingRequest> {
        self.0.last_request.lock().unwrap().clone()
    }

    /// Holds the next `list_slots(date)` response until the returned handle
    /// is notified.
    pub fn gate_list(&self, date: NaiveDate) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.0.list_gates.lock().unwrap().insert(date, gate.clone());
        gate
    }

    /// Holds the next `book_slot` response until the returned handle is
    /// notified.
    pub fn gate_book(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.0.book_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn transport_ok(&self) -> Result<(), TransportError> {
        match self.0.success.load(Ordering::SeqCst) {
            true => Ok(()),
            false => Err(TransportError::Network("supposed to fail".into())),
        }
    }
}

#[async_trait]
impl SchedulingService for MockScheduling {
    async fn list_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, TransportError> {
        self.0.calls_to_list_slots.fetch_add(1, Ordering::SeqCst);
        let gate = self.0.list_gates.lock().unwrap().get(&date).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.transport_ok()?;
        Ok(self
            .0
            .slots
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .unwrap_or_default())
    }

    async fn book_slot(&self, request: &BookingRequest) -> Result<BookingResult, TransportError> {
        self.0.calls_to_book_slot.fetch_add(1, Ordering::SeqCst);
        *self.0.last_request.lock().unwrap() = Some(request.clone());
        let gate = self.0.book_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.transport_ok()?;
        match self.0.booking_outcome.lock().unwrap().clone() {
            Some(outcome) => Ok(outcome),
            None => Ok(BookingResult::Confirmed {
                slot_id: request.slot_id.clone(),
            }),
        }
    }
}
