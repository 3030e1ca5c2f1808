//! Progress normalization.
//!
//! The engine reports progress as display strings on its stdout
//! (`[download]  42.3% of 10.00MiB at 1.23MiB/s ETA 00:05`). This module
//! turns those raw payloads into [`ProgressEvent`]s. A percent field that
//! does not parse drops that single update: no event, no error.

use regex::Regex;
use std::sync::OnceLock;

use crate::core::models::ProgressEvent;

fn download_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\[download\]\s+(?P<percent>[^\s]+)%\s+of\s+~?\S+(?:\s+at\s+(?P<speed>\S+))?(?:\s+ETA\s+(?P<eta>[0-9:]+))?",
        )
        .expect("progress regex")
    })
}

fn destination_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[download\]\s+Destination:\s+(?P<path>.+)$").expect("destination regex"))
}

/// Normalize a raw progress payload into an event.
///
/// `percent` tolerates a trailing `%` and a comma decimal separator.
/// Returns `None` when the percent is not numeric.
pub fn normalize(percent: &str, speed: &str, eta_seconds: u64, title: &str) -> Option<ProgressEvent> {
    let cleaned = percent.trim().trim_end_matches('%').replace(',', ".");
    let value: f32 = cleaned.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(ProgressEvent {
        percent: value.clamp(0.0, 100.0),
        speed: speed.trim().to_string(),
        eta_seconds,
        title: title.to_string(),
    })
}

/// Parse one engine stdout line into a progress event, if it is one.
pub fn parse_line(line: &str, title: &str) -> Option<ProgressEvent> {
    let caps = download_line_re().captures(line.trim())?;
    let percent = caps.name("percent")?.as_str();
    let speed = caps.name("speed").map(|m| m.as_str()).unwrap_or("");
    let eta = caps
        .name("eta")
        .and_then(|m| parse_clock(m.as_str()))
        .unwrap_or(0);

    normalize(percent, speed, eta, title)
}

/// Extract the item title from a `[download] Destination: <path>` line.
pub fn destination_title(line: &str) -> Option<String> {
    let caps = destination_line_re().captures(line.trim())?;
    let path = std::path::Path::new(caps.name("path")?.as_str().trim());
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// Whether a line is a progress tick (as opposed to an informational line).
pub fn is_progress_line(line: &str) -> bool {
    download_line_re().is_match(line.trim())
}

/// Parse `SS`, `MM:SS` or `HH:MM:SS` into seconds.
fn parse_clock(clock: &str) -> Option<u64> {
    let mut total = 0u64;
    for part in clock.split(':') {
        let value: u64 = part.parse().ok()?;
        total = total * 60 + value;
    }
    Some(total)
}
