//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use movienight_core::EventRecord;
use movienight_providers::{BoxFuture, CalendarProvider, CreatedEvent, ProviderError, ProviderResult};

/// Records every call; fails the ranks listed in `fail_ranks`.
#[derive(Debug, Default)]
pub struct FakeCalendar {
    fail_ranks: Vec<u32>,
    calls: Mutex<Vec<(String, u32, String)>>,
}

impl FakeCalendar {
    pub fn failing(ranks: &[u32]) -> Self {
        Self {
            fail_ranks: ranks.to_vec(),
            ..Default::default()
        }
    }

    /// `(calendar_id, rank, summary)` per call, in order.
    pub fn calls(&self) -> Vec<(String, u32, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CalendarProvider for FakeCalendar {
    fn name(&self) -> &str {
        "fake"
    }

    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a EventRecord,
    ) -> BoxFuture<'a, ProviderResult<CreatedEvent>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push((
                calendar_id.to_string(),
                event.rank,
                event.summary.clone(),
            ));
            if self.fail_ranks.contains(&event.rank) {
                Err(ProviderError::rate_limited("quota exceeded").with_provider("fake"))
            } else {
                Ok(CreatedEvent::new(
                    format!("evt{}", event.rank),
                    Some(format!("https://calendar.example/evt{}", event.rank)),
                ))
            }
        })
    }
}
