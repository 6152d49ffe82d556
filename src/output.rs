use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::app::{ProgressEvent, ProgressSink, RunResult};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_run(result: &RunResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Forwards progress events to the log.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => info!(
                elapsed_ms = elapsed_ms(elapsed),
                "{}", event.message
            ),
            None => info!("{}", event.message),
        }
    }
}

/// Milliseconds for the log, saturating instead of truncating.
fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

pub fn print_summary(result: &RunResult) {
    let verb = if result.dry_run { "Planned" } else { "Downloaded" };
    println!(
        "{verb} {} races from {} elections",
        result.race_count(),
        result.elections.len()
    );
    for election in &result.elections {
        println!("{} {} (election {})", election.year, election.name, election.election_id);
        for race in &election.races {
            match (&race.clean_path, race.rows) {
                (Some(path), Some(rows)) => {
                    println!("  {} -> {path} ({rows} precincts)", race.race_name)
                }
                _ => println!("  {} -> {}", race.race_name, race.raw_path),
            }
        }
    }
}
