// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write as _;

use clap::ValueEnum;
use pt_core::{JobState, PersistedJobRef, StepStatus, Timeline};
use pt_engine::TrackerEvent;
use serde::Serialize;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Format a duration in seconds as a short age ("5s", "2m", "1h", "3d")
pub fn format_elapsed(secs: u64) -> String {
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3_599 => format!("{}m", secs / 60),
        3_600..=86_399 => format!("{}h", secs / 3_600),
        _ => format!("{}d", secs / 86_400),
    }
}

pub fn format_time_ago(epoch_ms: u64, now_ms: u64) -> String {
    if epoch_ms == 0 {
        return "-".to_string();
    }
    format_elapsed(now_ms.saturating_sub(epoch_ms) / 1000)
}

fn marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Pending => "·",
        StepStatus::Active => "▸",
        StepStatus::Complete => "✓",
        StepStatus::Error => "✗",
    }
}

/// One-line job summary: id, status, phase and progress when known.
pub fn format_job_line(state: &JobState) -> String {
    let mut line = format!("Job {} {}", color::header(state.id.as_str()), state.status);
    if let Some(phase) = state.phase.as_deref().filter(|p| !p.is_empty()) {
        let _ = write!(line, " ({phase})");
    }
    if let Some(pct) = state.progress_pct() {
        let _ = write!(line, " {pct:.0}%");
    }
    line
}

/// Render the timeline, one step per line, with the job line on top when a
/// snapshot is available.
pub fn render_timeline(state: Option<&JobState>, timeline: &Timeline) -> String {
    let mut out = String::new();
    if let Some(state) = state {
        let _ = writeln!(out, "{}", format_job_line(state));
    }

    let width = timeline.entries.iter().map(|e| e.label.chars().count()).max().unwrap_or(0);
    for (i, entry) in timeline.entries.iter().enumerate() {
        let focus = if i == timeline.active_index && entry.status != StepStatus::Pending {
            ">"
        } else {
            " "
        };
        let label = format!("{:width$}", entry.label);
        let _ = write!(
            out,
            "{focus} {} {}  {}",
            color::step(entry.status, marker(entry.status)),
            color::step(entry.status, &label),
            entry.message,
        );
        if let Some(reason) = &entry.reason {
            let _ = write!(out, " {}", color::muted(&format!("[{reason}]")));
        }
        if let Some(ts) = &entry.timestamp {
            let _ = write!(out, " {}", color::context(ts));
        }
        out.push('\n');
    }

    if let Some(error) = state.and_then(|s| s.error.as_deref()).filter(|e| !e.is_empty()) {
        let _ = writeln!(out, "  error: {error}");
    }
    out
}

pub fn render_job_ref(job_ref: &PersistedJobRef, now_ms: u64) -> String {
    let correlation = &job_ref.correlation;
    let mut out = String::new();
    let _ = writeln!(out, "Job:         {}", color::header(job_ref.job_id.as_str()));
    if let Some(label) = correlation.request.label() {
        let _ = writeln!(out, "Request:     {label}");
    }
    let _ = writeln!(
        out,
        "Submitted:   {} ago",
        format_time_ago(correlation.submitted_at_ms, now_ms)
    );
    if !correlation.initial_status.is_empty() {
        let _ = writeln!(out, "Accepted as: {}", correlation.initial_status);
    }
    let _ = writeln!(out, "Correlation: {}", color::muted(correlation.correlation_id.as_str()));
    out
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turns tracker events into output, skipping snapshots that would repeat
/// the last one shown.
#[derive(Debug, Default)]
pub struct EventPrinter {
    format: OutputFormat,
    last: Option<String>,
}

impl EventPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format, last: None }
    }

    pub fn render(&mut self, event: &TrackerEvent) -> anyhow::Result<Option<String>> {
        if self.format == OutputFormat::Json {
            return Ok(Some(serde_json::to_string(event)?));
        }
        let text = match event {
            TrackerEvent::Update { state, timeline } => {
                let text = render_timeline(Some(state), timeline);
                if self.last.as_deref() == Some(text.as_str()) {
                    return Ok(None);
                }
                self.last = Some(text.clone());
                text
            }
            TrackerEvent::Terminal { .. } => return Ok(None),
            TrackerEvent::TransientError { message } => {
                format!("{}\n", color::muted(&format!("poll failed, retrying: {message}")))
            }
        };
        Ok(Some(text))
    }
}
