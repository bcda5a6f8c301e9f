use crate::error::{SlotSelectError, SubmitError};
use crate::service::SchedulingService;
use crate::types::{BookingRequest, BookingResult, Identity, Slot, SlotId, SlotStatus};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

const GENERIC_FAILURE_REASON: &str = "booking failed, please try again";

/// Workflow phase. `Confirmed` and `Failed` are terminal per attempt and
/// return to `SlotsReady` on dismissal.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    LoadingSlots,
    SlotsReady,
    SlotSelected,
    Submitting,
    Confirmed { slot_id: SlotId },
    Failed { reason: String },
}

/// Snapshot handed to views. Published through a watch channel after every
/// transition; views render it and dispatch the controller operations back.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub phase: Phase,
    pub date: Option<NaiveDate>,
    pub slots: Vec<Slot>,
    pub selected: Option<SlotId>,
    pub fetch_error: Option<String>,
    pub validation_errors: Vec<String>,
}

impl ViewState {
    fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            date: None,
            slots: Vec::new(),
            selected: None,
            fetch_error: None,
            validation_errors: Vec::new(),
        }
    }
}

struct Inner {
    view: ViewState,
    // Bumped on every select_date; responses carrying an older value are
    // stale and get dropped (last-date-wins).
    epoch: u64,
    // Bumped whenever a booking attempt reaches Confirmed/Failed, so an
    // auto-dismiss timer can tell its own outcome from a later one.
    attempt: u64,
}

struct Shared {
    inner: Mutex<Inner>,
    publisher: watch::Sender<ViewState>,
}

impl Shared {
    fn publish(&self, inner: &Inner) {
        self.publisher.send_replace(inner.view.clone());
    }

    fn apply_dismiss(inner: &mut Inner) -> bool {
        if matches!(
            inner.view.phase,
            Phase::Confirmed { .. } | Phase::Failed { .. }
        ) {
            inner.view.phase = Phase::SlotsReady;
            inner.view.fetch_error = None;
            inner.view.validation_errors.clear();
            true
        } else {
            false
        }
    }
}

/// The slot-selection-and-booking state machine. One instance per mounted
/// workflow; the injected service is the only collaborator it talks to.
pub struct BookingController<S> {
    service: S,
    identity: Identity,
    auto_dismiss: Option<Duration>,
    shared: Arc<Shared>,
}

impl<S: SchedulingService> BookingController<S> {
    pub fn new(service: S, identity: Identity) -> Self {
        let view = ViewState::idle();
        let (publisher, _) = watch::channel(view.clone());
        Self {
            service,
            identity,
            auto_dismiss: None,
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    view,
                    epoch: 0,
                    attempt: 0,
                }),
                publisher,
            }),
        }
    }

    /// Confirmation/failure screens dismiss themselves after `delay` unless
    /// the user gets there first.
    pub fn with_auto_dismiss(mut self, delay: Duration) -> Self {
        self.auto_dismiss = Some(delay);
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> ViewState {
        self.shared.inner.lock().unwrap().view.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.publisher.subscribe()
    }

    pub fn state_stream(&self) -> WatchStream<ViewState> {
        WatchStream::new(self.subscribe())
    }

    /// Valid from any state. Invalidates the current list and selection and
    /// fetches the new date's slots; a response for a superseded date is
    /// silently dropped.
    pub async fn select_date(&self, date: NaiveDate) {
        let tag = {
            let mut inner = self.shared.inner.lock().unwrap();
            inner.epoch += 1;
            inner.view.date = Some(date);
            inner.view.phase = Phase::LoadingSlots;
            inner.view.slots.clear();
            inner.view.selected = None;
            inner.view.fetch_error = None;
            inner.view.validation_errors.clear();
            self.shared.publish(&inner);
            inner.epoch
        };

        debug!(interviewer = %self.identity.interviewer_id, %date, "loading slots");
        let outcome = self.service.list_slots(date).await;

        let mut inner = self.shared.inner.lock().unwrap();
        if inner.epoch != tag {
            debug!(%date, "dropping stale slot list");
            return;
        }
        match outcome {
            Ok(mut slots) => {
                // Server order is not guaranteed
                slots.sort_by_key(|slot| slot.start_time);
                info!(%date, count = slots.len(), "slots loaded");
                inner.view.slots = slots;
            }
            Err(err) => {
                warn!(%date, error = %err, "slot fetch failed");
                inner.view.slots = Vec::new();
                inner.view.fetch_error = Some(err.to_string());
            }
        }
        inner.view.phase = Phase::SlotsReady;
        self.shared.publish(&inner);
    }

    /// Valid only in `SlotsReady`; a booked or unknown slot is rejected with
    /// the state left untouched.
    pub fn select_slot(&self, id: &SlotId) -> Result<(), SlotSelectError> {
        let mut inner = self.shared.inner.lock().unwrap();
        if inner.view.phase != Phase::SlotsReady {
            return Err(SlotSelectError::NotReady);
        }
        let slot = inner
            .view
            .slots
            .iter()
            .find(|slot| &slot.id == id)
            .ok_or_else(|| SlotSelectError::UnknownSlot(id.clone()))?;
        if !slot.is_available() {
            return Err(SlotSelectError::AlreadyBooked(id.clone()));
        }
        inner.view.selected = Some(id.clone());
        inner.view.phase = Phase::SlotSelected;
        inner.view.validation_errors.clear();
        self.shared.publish(&inner);
        Ok(())
    }

    /// Valid only in `SlotSelected`. Local validation runs first and keeps
    /// the service out of reach until every reason is resolved; the submitted
    /// request is a snapshot, immune to date changes that race it.
    pub async fn submit_booking(&self, name: &str, email: &str) -> Result<(), SubmitError> {
        let (request, tag) = {
            let mut inner = self.shared.inner.lock().unwrap();
            if inner.view.phase != Phase::SlotSelected {
                return Err(SubmitError::NoSelection);
            }
            let selected = inner.view.selected.clone().ok_or(SubmitError::NoSelection)?;
            let date = inner.view.date.ok_or(SubmitError::NoSelection)?;

            let request = BookingRequest::new(selected.clone(), name, email, date);
            let mut reasons = request.validation_reasons();
            let still_bookable = inner
                .view
                .slots
                .iter()
                .any(|slot| slot.id == selected && slot.is_available());
            if !still_bookable {
                reasons.push(format!("slot {selected} is no longer available"));
            }
            if !reasons.is_empty() {
                debug!(slot = %selected, ?reasons, "booking rejected locally");
                inner.view.validation_errors = reasons.clone();
                self.shared.publish(&inner);
                return Err(SubmitError::Invalid { reasons });
            }

            inner.view.validation_errors.clear();
            inner.view.phase = Phase::Submitting;
            self.shared.publish(&inner);
            (request, inner.epoch)
        };

        info!(slot = %request.slot_id, date = %request.date, "submitting booking");
        let outcome = self.service.book_slot(&request).await;

        let mut inner = self.shared.inner.lock().unwrap();
        if inner.epoch != tag {
            // The user moved on to another date mid-flight. The booking
            // still settled server-side; its outcome just no longer applies
            // to the visible list.
            debug!(slot = %request.slot_id, "dropping booking outcome for superseded date");
            return Ok(());
        }
        match outcome {
            Ok(BookingResult::Confirmed { slot_id }) => {
                // Optimistic: mark it booked now, a later re-fetch reconciles
                if let Some(slot) = inner.view.slots.iter_mut().find(|slot| slot.id == slot_id) {
                    slot.status = SlotStatus::Booked;
                }
                info!(slot = %slot_id, "booking confirmed");
                inner.view.selected = None;
                inner.view.phase = Phase::Confirmed { slot_id };
            }
            Ok(BookingResult::Rejected { reason }) => {
                let reason = if reason.trim().is_empty() {
                    GENERIC_FAILURE_REASON.to_owned()
                } else {
                    reason
                };
                warn!(slot = %request.slot_id, %reason, "booking rejected");
                inner.view.phase = Phase::Failed { reason };
            }
            Err(err) => {
                warn!(slot = %request.slot_id, error = %err, "booking submission failed");
                inner.view.phase = Phase::Failed {
                    reason: err.to_string(),
                };
            }
        }
        inner.attempt += 1;
        let attempt = inner.attempt;
        self.shared.publish(&inner);
        drop(inner);

        self.schedule_auto_dismiss(attempt);
        Ok(())
    }

    /// Returns from `Confirmed`/`Failed` to `SlotsReady` with the retained
    /// list; a no-op anywhere else. Never re-fetches.
    pub fn dismiss(&self) {
        let mut inner = self.shared.inner.lock().unwrap();
        if Shared::apply_dismiss(&mut inner) {
            self.shared.publish(&inner);
        }
    }

    fn schedule_auto_dismiss(&self, attempt: u64) {
        let Some(delay) = self.auto_dismiss else {
            return;
        };
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = shared.inner.lock().unwrap();
            if inner.attempt != attempt {
                return;
            }
            if Shared::apply_dismiss(&mut inner) {
                debug!("auto-dismissed booking outcome");
                shared.publish(&inner);
            }
        });
    }
}
