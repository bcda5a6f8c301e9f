use crate::service::{SchedulingService, TransportError};
use crate::types::{BookingRequest, BookingResult, Slot, SlotId, SlotStatus};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct SlotRecord {
    slot: Slot,
    booker_name: String,
    booker_email: String,
}

/// In-memory scheduling service. Stands in for the real backend in the demo
/// binary and in tests that want actual booking semantics instead of canned
/// responses.
#[derive(Debug, Clone, Default)]
pub struct LocalScheduling {
    slots: Arc<Mutex<HashMap<NaiveDate, Vec<SlotRecord>>>>,
}

impl LocalScheduling {
    /// Adds a slot for the given day, refusing intervals that overlap an
    /// existing slot on that day.
    pub fn add_slot(
        &self,
        date: NaiveDate,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<SlotId, String> {
        if start_time >= end_time {
            return Err("slot must start before it ends".into());
        }
        let candidate = Slot {
            id: SlotId::new(Uuid::new_v4().to_string()),
            start_time,
            end_time,
            status: SlotStatus::Available,
        };

        let mut slots = self.slots.lock().unwrap();
        let day = slots.entry(date).or_default();
        if day.iter().any(|record| record.slot.overlaps(&candidate)) {
            return Err("slot overlaps an existing slot on this date".into());
        }
        let id = candidate.id.clone();
        day.push(SlotRecord {
            slot: candidate,
            booker_name: String::new(),
            booker_email: String::new(),
        });
        Ok(id)
    }

    /// Three half-hour morning slots per day for the next `days` days.
    pub fn seed_example_slots(&self, days: i64) {
        for offset in 1..=days {
            let date = Utc::now().date_naive() + Duration::days(offset);
            for hour in [9, 10, 11] {
                let start = date.and_hms_opt(hour, 0, 0).unwrap().and_utc();
                let _ = self.add_slot(date, start, start + Duration::minutes(30));
            }
        }
    }

    /// Name and email recorded for a booked slot, if any.
    pub fn booker_of(&self, date: NaiveDate, id: &SlotId) -> Option<(String, String)> {
        let slots = self.slots.lock().unwrap();
        slots.get(&date)?.iter().find(|record| &record.slot.id == id).map(
            |record| (record.booker_name.clone(), record.booker_email.clone()),
        )
    }
}

#[async_trait]
impl SchedulingService for LocalScheduling {
    async fn list_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, TransportError> {
        let slots = self.slots.lock().unwrap();
        let day: Vec<Slot> = slots
            .get(&date)
            .map(|records| records.iter().map(|record| record.slot.clone()).collect())
            .unwrap_or_default();
        debug!(%date, count = day.len(), "listing local slots");
        Ok(day)
    }

    async fn book_slot(&self, request: &BookingRequest) -> Result<BookingResult, TransportError> {
        let mut slots = self.slots.lock().unwrap();
        let record = slots
            .get_mut(&request.date)
            .and_then(|day| day.iter_mut().find(|record| record.slot.id == request.slot_id));

        let Some(record) = record else {
            return Ok(BookingResult::Rejected {
                reason: "slot does not exist".into(),
            });
        };
        if !record.slot.is_available() {
            return Ok(BookingResult::Rejected {
                reason: "slot was already booked".into(),
            });
        }

        record.slot.status = SlotStatus::Booked;
        record.booker_name = request.name.clone();
        record.booker_email = request.email.clone();
        info!(slot = %request.slot_id, booker = %request.name, "local slot booked");
        Ok(BookingResult::Confirmed {
            slot_id: request.slot_id.clone(),
        })
    }
}
