//! Console observer for the alert value.
//!
//! A deliberately plain presentation layer: one line per alert change,
//! either a text banner or a JSON object.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use hangwatch_types::{current_timestamp_ms, AlertState};
use serde::Serialize;
use tokio::sync::watch;

/// How alert changes are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct AlertEvent<'a> {
    timestamp_ms: u64,
    alert: &'a AlertState,
}

/// Render one alert state as a single line.
pub fn render(state: &AlertState, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(match state {
            Some(alert) => format!("[{}] {}", alert.severity.symbol(), alert.message),
            None => "[OK] responsive".to_string(),
        }),
        OutputFormat::Json => Ok(serde_json::to_string(&AlertEvent {
            timestamp_ms: current_timestamp_ms(),
            alert: state,
        })?),
    }
}

/// Print every alert change until the notifier goes away.
///
/// Returns the number of lines written.
pub async fn watch_alerts<W>(
    mut rx: watch::Receiver<AlertState>,
    format: OutputFormat,
    mut out: W,
) -> Result<usize>
where
    W: Write,
{
    let mut written = 0;
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        writeln!(out, "{}", render(&state, format)?)?;
        out.flush()?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangwatch_types::{Alert, Severity};

    fn critical() -> AlertState {
        Some(Alert::new(
            Severity::Critical,
            "App Hang Detected (> 250ms)",
            3,
            1_703_160_000_000,
        ))
    }

    #[test]
    fn text_banner() {
        assert_eq!(
            render(&critical(), OutputFormat::Text).unwrap(),
            "[CRIT] App Hang Detected (> 250ms)"
        );
        assert_eq!(render(&None, OutputFormat::Text).unwrap(), "[OK] responsive");
    }

    #[test]
    fn json_line() {
        let line = render(&critical(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["alert"]["severity"], "critical");
        assert_eq!(value["alert"]["message"], "App Hang Detected (> 250ms)");
        assert_eq!(value["alert"]["generation"], 3);
        assert!(value["timestamp_ms"].as_u64().unwrap() > 0);

        let cleared = render(&None, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&cleared).unwrap();
        assert!(value["alert"].is_null());
    }

    #[test]
    fn prints_each_change_until_sender_drops() {
        let (tx, rx) = watch::channel::<AlertState>(None);
        let mut out = Vec::new();

        tokio_test::block_on(async {
            tx.send_replace(critical());
            let printer = watch_alerts(rx, OutputFormat::Text, &mut out);
            drop(tx);
            printer.await.unwrap();
        });

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, "[CRIT] App Hang Detected (> 250ms)\n");
    }
}
