//! Watch command: an interactive session fed from stdin
//!
//! Each input line replaces the manual coordinates. `lat lon` and `lat, lon`
//! are both accepted; a comma allows leaving one side empty (`, 20`).

use crate::app::App;
use anyhow::Result;
use geolocator_cli::output::{format_count, format_km, print_json};
use geolocator_cli::{OutputFormat, Status};
use geolocator_session::{AutoPosition, Session, SessionController, SessionView, Update};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Serialize)]
struct WatchEvent<'a> {
    #[serde(flatten)]
    update: &'a Update,
    session: SessionView,
}

/// Run the session until stdin closes and pending lookups finish
pub async fn run(app: &App) -> Result<ExitCode> {
    let client = Arc::new(app.client()?);
    let source = app.position_source(&client)?;

    let mut controller = SessionController::new(app.session(), client);
    controller.locate(source);

    let handle = controller.handle();
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let (latitude, longitude) = parse_input_line(&line);
            if !handle.set_manual(latitude, longitude) {
                break;
            }
        }
        handle.close();
    });

    if !app.format.is_json() {
        Status::info("Enter \"lat lon\" per line; Ctrl-D to finish");
    }

    let format = app.format;
    let session = controller
        .run(|session, update| render(format, session, update))
        .await;
    reader.await?;

    if !format.is_json() {
        Status::info(&format_count(
            usize::try_from(session.lookups_issued()).unwrap_or(usize::MAX),
            "lookup issued",
            "lookups issued",
        ));
    }
    super::report_metrics(app);

    Ok(ExitCode::SUCCESS)
}

fn render(format: OutputFormat, session: &Session, update: &Update) {
    if format.is_json() {
        let event = WatchEvent {
            update,
            session: session.view(),
        };
        if let Err(e) = print_json(&event) {
            tracing::warn!(error = %e, "Failed to serialize session event");
        }
        return;
    }

    match update {
        Update::Located => {
            if let (AutoPosition::Located(point), Some(distances)) =
                (session.auto_position(), session.distances())
            {
                Status::success(&format!(
                    "Position {point}; North Pole {}, Moon {}",
                    format_km(distances.north_pole_km),
                    format_km(distances.moon_km)
                ));
            }
        }
        Update::PositionFailed => Status::warning("Position unavailable; still loading"),
        Update::Input { .. } => {
            println!(
                "{} {}, {}",
                "→".dimmed(),
                session.manual_latitude(),
                session.manual_longitude()
            );
            super::print_validation(session.validation());
        }
        Update::Place {
            ticket,
            applied: true,
        } => println!("  {} {} {}", "Place:".bold(), session.place(), ticket.dimmed()),
        Update::Place { applied: false, .. } => {}
        Update::LookupFailed { ticket } => {
            Status::warning(&format!("Lookup {ticket} failed; place unchanged"));
        }
    }
}

/// Split an input line into latitude and longitude text
fn parse_input_line(line: &str) -> (String, String) {
    let line = line.trim();
    let (latitude, longitude) = match line.split_once(',') {
        Some((lat, lon)) => (lat.trim(), lon.trim()),
        None => {
            let mut parts = line.split_whitespace();
            (parts.next().unwrap_or(""), parts.next().unwrap_or(""))
        }
    };
    (latitude.to_string(), longitude.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> (String, String) {
        parse_input_line(line)
    }

    #[test]
    fn test_whitespace_separated() {
        assert_eq!(parsed("10 20"), ("10".into(), "20".into()));
        assert_eq!(parsed("  -100\t200 "), ("-100".into(), "200".into()));
    }

    #[test]
    fn test_comma_separated() {
        assert_eq!(parsed("38, 35"), ("38".into(), "35".into()));
        assert_eq!(parsed(", 20"), (String::new(), "20".into()));
    }

    #[test]
    fn test_partial_and_empty() {
        assert_eq!(parsed("10"), ("10".into(), String::new()));
        assert_eq!(parsed(""), (String::new(), String::new()));
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        assert_eq!(parsed("abc 1e2"), ("abc".into(), "1e2".into()));
    }
}
