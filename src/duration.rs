//! Human-friendly durations for command-line flags.

use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Parse durations like "150ms", "2s", "1.5s", "500us" or "0".
///
/// A bare number is taken as milliseconds, matching the unit every
/// watchdog setting is stored in.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    let value: f64 = number
        .parse()
        .with_context(|| format!("invalid duration {:?}", input))?;

    let nanos_per_unit = match unit.trim() {
        "ns" => 1.0,
        "us" | "µs" => 1e3,
        "" | "ms" => 1e6,
        "s" => 1e9,
        "m" | "min" => 60e9,
        other => bail!("unknown duration unit {:?} in {:?}", other, input),
    };

    Ok(Duration::from_nanos((value * nanos_per_unit).round() as u64))
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub fn as_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Format a duration the way alerts and logs print it.
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
