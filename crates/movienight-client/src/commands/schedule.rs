//! The `schedule` command: plan, confirm, authenticate, submit.

use std::sync::Arc;
use std::time::Duration;

use movienight_core::{TitleList, YearMonth, MAX_TITLES};
use movienight_providers::google::{Authenticator, OAuthClient};
use movienight_providers::{BoxFuture, CalendarProvider};
use tracing::info;

use crate::cli::ScheduleArgs;
use crate::config::{ClientConfig, GoogleSettings};
use crate::error::{ClientError, ClientResult};
use crate::ledger::Ledger;
use crate::prompt::{Confirm, FixedAnswer, TerminalConfirm};
use crate::scheduler::{self, PlannedEvent, RunSummary, SubmitOptions};

/// Produces an authenticated calendar.
///
/// Only called once every local precondition holds.
pub trait SessionSource {
    fn open_calendar<'a>(
        &'a mut self,
        settings: &'a GoogleSettings,
    ) -> BoxFuture<'a, ClientResult<Arc<dyn CalendarProvider>>>;
}

/// Google Calendar through the stored credential or browser consent.
#[derive(Debug, Default)]
pub struct GoogleSessionSource;

impl SessionSource for GoogleSessionSource {
    fn open_calendar<'a>(
        &'a mut self,
        settings: &'a GoogleSettings,
    ) -> BoxFuture<'a, ClientResult<Arc<dyn CalendarProvider>>> {
        Box::pin(async move {
            let config = settings.to_provider_config()?;
            let oauth = OAuthClient::new(&config)?;
            let mut authenticator = Authenticator::new(&config, oauth);
            let session = authenticator.obtain_session().await?;
            let client: Arc<dyn CalendarProvider> = Arc::new(session.calendar_client()?);
            Ok(client)
        })
    }
}

/// Runs the `schedule` command against Google Calendar.
pub async fn run(args: &ScheduleArgs, config: ClientConfig) -> ClientResult<()> {
    let mut source = GoogleSessionSource;
    if args.yes {
        execute(args, config, &mut source, &FixedAnswer(true)).await?;
    } else {
        execute(args, config, &mut source, &TerminalConfirm).await?;
    }
    Ok(())
}

/// Runs the full pipeline.
///
/// Attendees, titles, timezone and ledger are all checked before `source`
/// is asked to authenticate, so configuration mistakes never trigger a
/// consent flow.
pub async fn execute<S>(
    args: &ScheduleArgs,
    config: ClientConfig,
    source: &mut S,
    confirm: &dyn Confirm,
) -> ClientResult<RunSummary>
where
    S: SessionSource + ?Sized,
{
    let config = config.with_overrides(args);

    let attendees = config.resolve_attendees()?;
    let template = config.template()?;
    if config.google.calendar_id.trim().is_empty() {
        return Err(ClientError::Config(
            "google.calendar_id must not be empty".to_string(),
        ));
    }
    let titles = match args.titles {
        Some(ref path) => TitleList::from_file(path)?,
        None => TitleList::builtin(),
    };
    if args.resume && config.run.ledger_path.is_none() {
        return Err(ClientError::Config(
            "--resume needs a ledger (--ledger or run.ledger_path)".to_string(),
        ));
    }
    let mut ledger = config
        .run
        .ledger_path
        .as_ref()
        .map(Ledger::open)
        .transpose()?;
    let start = start_month(args, ledger.as_ref())?;

    println!("Starting NYT Top 100 Films Calendar Creation...");

    if !titles.is_complete() {
        println!(
            "Warning: Only {} films provided. Please add the remaining {} films to the list.",
            titles.len(),
            titles.missing()
        );
        if !confirm.confirm("Do you want to proceed with the available films?")? {
            println!("Nothing was created.");
            return Ok(RunSummary::default());
        }
    }

    let planned = scheduler::plan(&titles, start, config.convention(), &template, &attendees)?;
    info!(
        "planned {} events from {} ({:?} convention)",
        planned.len(),
        start,
        config.convention()
    );

    if args.dry_run {
        print_plan(&planned, &config.google.calendar_id);
        return Ok(RunSummary::default());
    }

    if let Some(ref mut ledger) = ledger {
        ledger.set_start(start);
    }

    println!("Authenticating with Google Calendar...");
    let calendar = source.open_calendar(&config.google).await?;

    let options = SubmitOptions {
        calendar_id: config.google.calendar_id.clone(),
        delay: Duration::from_millis(config.run.delay_ms),
        resume: args.resume,
    };
    let summary =
        scheduler::submit_all(calendar.as_ref(), &planned, &options, ledger.as_mut()).await?;

    println!();
    if summary.skipped > 0 {
        println!("Skipped {} events already in the ledger.", summary.skipped);
    }
    println!(
        "Completed! Created {}/{} movie night events.",
        summary.succeeded, summary.attempted
    );
    if summary.transient > 0 {
        println!(
            "{} of the failures were temporary (quota, network or server) and may succeed on a rerun.",
            summary.transient
        );
    }
    Ok(summary)
}

/// Picks the first month of the run.
///
/// A resumed run keeps the ledger's start month so titles map to the same
/// months as before.
fn start_month(args: &ScheduleArgs, ledger: Option<&Ledger>) -> ClientResult<YearMonth> {
    let recorded = if args.resume {
        ledger.and_then(Ledger::start)
    } else {
        None
    };
    match (args.start, recorded) {
        (Some(start), Some(recorded)) if start != recorded => Err(ClientError::Config(format!(
            "--start {} does not match the ledger's start month {}",
            start, recorded
        ))),
        (Some(start), _) => Ok(start),
        (None, Some(recorded)) => Ok(recorded),
        (None, None) => Ok(YearMonth::current()),
    }
}

fn print_plan(planned: &[PlannedEvent], calendar_id: &str) {
    for item in planned {
        let event = &item.record;
        println!(
            "{}/{}  {}  {}-{} {}  {}",
            event.rank,
            MAX_TITLES,
            event.date,
            event.start.format("%H:%M"),
            event.end.format("%H:%M"),
            event.timezone,
            event.summary
        );
    }
    println!();
    println!(
        "Dry run: {} events would be created on calendar '{}'. Nothing was submitted.",
        planned.len(),
        calendar_id
    );
}
