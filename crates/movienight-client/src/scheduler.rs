//! Batch planning and submission.
//!
//! Title `i` (0-based) lands on the first Sunday of the start month plus `i`
//! months. Submissions run one at a time with a fixed pause between them; a
//! failed submission is reported and the batch moves on.

use std::time::Duration;

use movienight_core::{
    EventRecord, EventTemplate, ScheduleResult, SundayConvention, TitleList, YearMonth, MAX_TITLES,
};
use movienight_providers::CalendarProvider;
use tracing::{debug, warn};

use crate::error::ClientResult;
use crate::ledger::{Ledger, LedgerEntry, Outcome};

/// An event ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEvent {
    pub month: YearMonth,
    pub record: EventRecord,
}

/// Builds one event per schedulable title, ranks 1..=n.
pub fn plan(
    titles: &TitleList,
    start: YearMonth,
    convention: SundayConvention,
    template: &EventTemplate,
    attendees: &[String],
) -> ScheduleResult<Vec<PlannedEvent>> {
    titles
        .schedulable()
        .iter()
        .enumerate()
        .map(|(i, title)| -> ScheduleResult<PlannedEvent> {
            let month = start.plus_months(i as u32)?;
            let date = month.first_sunday(convention)?;
            let record = template.build(title, date, i as u32 + 1, attendees);
            Ok(PlannedEvent { month, record })
        })
        .collect()
}

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Failures a rerun may fix (quota, network, server).
    pub transient: usize,
    /// Items the ledger already recorded as created.
    pub skipped: usize,
}

/// Options for [`submit_all`].
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub calendar_id: String,
    /// Pause between two submissions.
    pub delay: Duration,
    /// Skip items the ledger records as created.
    pub resume: bool,
}

/// Submits every planned event in order.
///
/// # Errors
///
/// Provider failures are counted, not returned. Only a ledger write failure
/// stops the batch.
pub async fn submit_all<P>(
    provider: &P,
    plan: &[PlannedEvent],
    options: &SubmitOptions,
    mut ledger: Option<&mut Ledger>,
) -> ClientResult<RunSummary>
where
    P: CalendarProvider + ?Sized,
{
    let mut summary = RunSummary::default();

    for item in plan {
        let event = &item.record;

        if options.resume
            && let Some(ref ledger) = ledger
            && ledger.is_created(&event.title, item.month)
        {
            println!(
                "Skipping event {}/{}: {} on {} (already created)",
                event.rank, MAX_TITLES, event.title, event.date
            );
            summary.skipped += 1;
            continue;
        }

        if summary.attempted > 0 && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }

        println!(
            "Creating event {}/{}: {} on {}",
            event.rank, MAX_TITLES, event.title, event.date
        );
        summary.attempted += 1;

        let outcome = match provider.insert_event(&options.calendar_id, event).await {
            Ok(created) => {
                if let Some(ref link) = created.html_link {
                    println!("Event created: {}", link);
                }
                println!(
                    "✓ Successfully created event for '{}' on {}",
                    event.title, event.date
                );
                summary.succeeded += 1;
                Outcome::Created {
                    event_id: created.id,
                    html_link: created.html_link,
                }
            }
            Err(e) => {
                warn!("failed to create event #{} '{}': {}", event.rank, event.title, e);
                println!("Error creating event for {}: {}", event.title, e);
                println!("✗ Failed to create event for '{}'", event.title);
                summary.failed += 1;
                if e.is_transient() {
                    summary.transient += 1;
                }
                Outcome::Failed {
                    error: e.to_string(),
                    transient: e.is_transient(),
                }
            }
        };

        if let Some(ref mut ledger) = ledger {
            ledger.record(LedgerEntry::new(
                event.rank,
                &event.title,
                item.month,
                event.date,
                outcome,
            ))?;
        }
    }

    debug!("batch finished: {:?}", summary);
    Ok(summary)
}
