//! Interactive timer session.
//!
//! Drives the coordinator from a one-second `tokio` interval and reads
//! single-key commands from stdin, one per line:
//!
//! ```text
//! s start   p pause   x stop   r reset
//! 1-4 add label       l request a label   t show timer status
//! q quit (also on end of input)
//! ```

use std::time::Duration;

use clap::Args;
use labeltimer_core::{
    format_clock, option_for_key, Config, Event, InputFocus, KeyOutcome, LabelingMode,
    SettingsChange, TimerKind,
};
use tokio::io::AsyncBufReadExt;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{open, remember_active, require_active, App};

#[derive(Args)]
pub struct RunArgs {
    /// Project ID to run (defaults to the active project)
    #[arg(long)]
    pub project: Option<u64>,
    /// Timer kind: count-up or count-down
    #[arg(long)]
    pub kind: Option<TimerKind>,
    /// Labeling mode: 1 (automatic) or 2 (manual)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub mode: Option<u8>,
    /// Seconds between automatic label requests
    #[arg(long)]
    pub interval: Option<u64>,
    /// Count-down duration in seconds
    #[arg(long)]
    pub countdown: Option<u64>,
    /// Start the timer immediately
    #[arg(long)]
    pub start: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = open(false)?;
    let notifications = Config::load()?.notifications;
    let bell = notifications.enabled && notifications.bell;
    if let Some(id) = args.project {
        app.select_project(id)?;
    }
    require_active(&app)?;
    remember_active(&app)?;

    let mode = args.mode.map(LabelingMode::try_from).transpose()?;
    app.change_settings(SettingsChange {
        interval_secs: args.interval,
        countdown_secs: args.countdown,
        mode,
        kind: args.kind,
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(event_loop(&mut app, args.start, bell))?;
    app.shutdown();
    Ok(())
}

async fn event_loop(app: &mut App, start: bool, bell: bool) -> std::io::Result<()> {
    print_help();
    if start {
        app.start();
    }

    let period = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                for event in app.advance(1) {
                    report(&event, bell);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if !handle_command(app, line.trim(), bell) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Returns `false` when the loop should end.
fn handle_command(app: &mut App, command: &str, bell: bool) -> bool {
    match command {
        "" => {}
        "q" => return false,
        "s" => {
            app.start();
        }
        "p" => {
            app.pause();
        }
        "x" => {
            app.stop();
        }
        "r" => {
            if let Some(event) = app.reset() {
                report(&event, bell);
            }
        }
        "t" => {
            if let Some(event) = app.status() {
                report(&event, bell);
            }
        }
        "l" => {
            if let Some(event) = app.request_label() {
                report(&event, bell);
            }
        }
        "?" | "h" => print_help(),
        token => match app.key_pressed(token, InputFocus::Shortcut) {
            KeyOutcome::Labeled(entry) => {
                println!("{}  {}", format_clock(entry.time), entry.describe());
            }
            _ if option_for_key(token).is_some() => eprintln!("start the timer to label"),
            _ => eprintln!("unknown command: {token} (? for help)"),
        },
    }
    true
}

fn report(event: &Event, bell: bool) {
    match event {
        Event::LabelRequested { elapsed_secs, .. } => {
            if bell {
                eprint!("\x07");
            }
            println!("[{}] label requested: press 1-4", format_clock(*elapsed_secs));
        }
        Event::CountdownFinished { .. } => println!("time's up"),
        Event::TimerReset { elapsed_secs, .. } => {
            println!("[{}] reset", format_clock(*elapsed_secs));
        }
        Event::StateSnapshot {
            state,
            kind,
            elapsed_secs,
            ..
        } => println!("[{}] {state} ({kind})", format_clock(*elapsed_secs)),
        _ => {}
    }
}

fn print_help() {
    eprintln!("s start  p pause  x stop  r reset  1-4 label  l request label  t status  q quit");
}
