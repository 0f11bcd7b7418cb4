//! Track command - replay or stream position fixes against a project.
//!
//! Fixes are read as JSON lines (`{"lat": .., "lon": .., "accuracy": ..}`)
//! from a file or stdin on a reader thread. The session clock ticks once a
//! second until the input ends or Ctrl-C is pressed.

use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread::JoinHandle;

use console::style;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fieldcover::project::ProjectDocument;
use fieldcover::tracking::{
    PositionFix, SessionSnapshot, SharedTracker, Tracker, TrackerEvent, TICK_INTERVAL,
};

use super::common::{format_elapsed, resolve_tracking_config};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Queued fixes between the reader thread and the session.
const FIX_QUEUE_CAPACITY: usize = 1024;

/// Arguments for the track command.
pub struct TrackArgs {
    pub project: PathBuf,
    pub fixes: String,
    pub threshold: Option<f64>,
    pub accuracy_ceiling: Option<f64>,
}

/// What the reader thread saw.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct InputStats {
    accepted: usize,
    malformed: usize,
}

/// Run the track command.
pub fn run(args: TrackArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("track");

    let document = ProjectDocument::load(&args.project)?;
    let tracking = resolve_tracking_config(args.threshold, args.accuracy_ceiling, runner.config())?;
    info!(
        project = %document.name,
        points = document.points.len(),
        threshold_m = tracking.visit_threshold_meters,
        accuracy_ceiling_m = tracking.accuracy_ceiling_meters,
        "Starting tracking session"
    );

    let input: Box<dyn BufRead + Send> = if args.fixes == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let path = PathBuf::from(&args.fixes);
        let file = std::fs::File::open(&path).map_err(|source| CliError::FileRead { path, source })?;
        Box::new(BufReader::new(file))
    };

    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received interrupt, finishing session...");
        signal_token.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    println!(
        "Tracking {} ({} points). Reading fixes from {}. Press Ctrl-C to stop.",
        style(&document.name).bold(),
        document.points.len(),
        if args.fixes == "-" { "stdin" } else { args.fixes.as_str() }
    );

    let tracker = SharedTracker::new(Tracker::new(tracking, document.points));
    let runtime = runner.runtime()?;
    let (snapshot, stats) = runtime.block_on(run_session(tracker, input, cancellation))?;

    print_summary(&snapshot, stats);
    Ok(())
}

async fn run_session(
    tracker: SharedTracker,
    input: Box<dyn BufRead + Send>,
    cancellation: CancellationToken,
) -> Result<(SessionSnapshot, InputStats), CliError> {
    let mut events = tracker.subscribe();
    let (tx, mut fixes) = mpsc::channel(FIX_QUEUE_CAPACITY);

    // Detached: a blocked stdin read must not hold up shutdown
    let reader = std::thread::spawn(move || read_fixes(input, tx));

    tracker.start()?;
    let ticker = tracker.spawn_ticker(TICK_INTERVAL, cancellation.child_token());

    let mut input_ended = false;
    loop {
        tokio::select! {
            biased;

            _ = cancellation.cancelled() => break,

            event = events.recv() => match event {
                Ok(event) => print_event(&tracker, &event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "Event printer fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },

            fix = fixes.recv() => match fix {
                Some(fix) => {
                    tracker.update_position(&fix);
                }
                None => {
                    debug!("Fix input ended");
                    input_ended = true;
                    break;
                }
            },
        }
    }

    tracker.stop()?;
    cancellation.cancel();
    let _ = ticker.await;

    while let Ok(event) = events.try_recv() {
        print_event(&tracker, &event);
    }

    let stats = collect_stats(reader, input_ended);
    Ok((tracker.snapshot(), stats))
}

/// Join the reader once its sender is gone.
///
/// Before EOF the reader may be blocked on stdin, so it is left detached
/// and no counts are reported.
fn collect_stats(reader: JoinHandle<InputStats>, input_ended: bool) -> InputStats {
    if input_ended {
        reader.join().unwrap_or_default()
    } else {
        InputStats::default()
    }
}

/// Forward parsed fixes until EOF or the receiver goes away.
fn read_fixes(input: Box<dyn BufRead + Send>, tx: mpsc::Sender<PositionFix>) -> InputStats {
    let mut stats = InputStats::default();
    for (number, line) in input.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read fix input");
                break;
            }
        };
        match parse_fix_line(&line) {
            Some(Ok(fix)) => {
                stats.accepted += 1;
                if tx.blocking_send(fix).is_err() {
                    break;
                }
            }
            Some(Err(e)) => {
                stats.malformed += 1;
                warn!(line = number + 1, error = %e, "Skipping malformed fix");
            }
            None => {}
        }
    }
    stats
}

/// `None` for blank lines.
fn parse_fix_line(line: &str) -> Option<Result<PositionFix, serde_json::Error>> {
    let line = line.trim();
    if line.is_empty() {
        None
    } else {
        Some(serde_json::from_str(line))
    }
}

fn print_event(tracker: &SharedTracker, event: &TrackerEvent) {
    match event {
        TrackerEvent::PointVisited { index, coord } => {
            let snapshot = tracker.snapshot();
            println!(
                "  {} point {} at {:.6}, {:.6}  ({}/{})",
                style("✓").green().bold(),
                index,
                coord.lat,
                coord.lon,
                snapshot.visited,
                snapshot.total
            );
        }
        TrackerEvent::StatusChanged { from, to } => {
            debug!(%from, %to, "Session status changed");
        }
    }
}

fn print_summary(snapshot: &SessionSnapshot, stats: InputStats) {
    println!();
    println!("{}", style("Session summary").bold());
    println!("  Status:    {}", snapshot.status);
    println!("  Elapsed:   {}", format_elapsed(snapshot.elapsed_seconds));
    println!(
        "  Visited:   {}/{} ({:.1}%)",
        style(snapshot.visited).green().bold(),
        snapshot.total,
        snapshot.progress() * 100.0
    );
    println!("  Remaining: {}", snapshot.remaining());
    if stats.accepted > 0 || stats.malformed > 0 {
        println!("  Fixes:     {} read, {} malformed", stats.accepted, stats.malformed);
    }
}
