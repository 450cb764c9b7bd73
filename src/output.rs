// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::fmt::Display;
use std::time::Instant;

use crate::rollout::DiagnosticBundle;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Stage messages, warnings and a text report.
    Normal,
    /// Final result lines and warnings only (for CI).
    Quiet,
    /// One JSON object per line; the pipeline report is a single document.
    Json,
}

/// A JSON-lines event on stdout or stderr.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Stage {
        message: &'a str,
    },
    Success {
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<f64>,
    },
    Warning {
        message: &'a str,
    },
    Error {
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_secs: Option<f64>,
    },
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
        }
    }

    /// Start timing the command; success and error lines report the duration.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    fn elapsed(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    fn json(event: &Event<'_>, to_stderr: bool) {
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    /// Announce a pipeline stage. Quiet mode drops it.
    pub fn progress(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => Self::json(&Event::Stage { message }, false),
        }
    }

    pub fn success(&self, message: &str) {
        match (self.mode, self.elapsed()) {
            (OutputMode::Normal, Some(secs)) => println!("{message} ({secs:.1}s)"),
            (OutputMode::Normal | OutputMode::Quiet, _) => println!("{message}"),
            (OutputMode::Json, duration_secs) => Self::json(
                &Event::Success {
                    message,
                    duration_secs,
                },
                false,
            ),
        }
    }

    /// Print a non-fatal warning; shown in every mode.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Json => Self::json(&Event::Warning { message }, true),
            _ => eprintln!("Warning: {message}"),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Json => Self::json(
                &Event::Error {
                    message,
                    duration_secs: self.elapsed(),
                },
                true,
            ),
            _ => eprintln!("Error: {message}"),
        }
    }

    /// A bare result value such as a derived tag, printed as-is in every mode.
    pub fn value(&self, value: &str) {
        println!("{value}");
    }

    /// The final report: text in normal mode, one JSON document in JSON mode.
    pub fn report<T: Serialize + Display>(&self, report: &T) {
        match self.mode {
            OutputMode::Normal => print!("{report}"),
            OutputMode::Quiet => {}
            OutputMode::Json => {
                if let Ok(document) = serde_json::to_string(report) {
                    println!("{document}");
                }
            }
        }
    }

    /// Captures collected after a failed rollout, always on stderr.
    pub fn diagnostics(&self, bundle: &DiagnosticBundle) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(document) = serde_json::to_string(bundle) {
                    eprintln!("{document}");
                }
            }
            _ => eprint!("{bundle}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_kind() {
        let json = serde_json::to_string(&Event::Warning { message: "scan found 2 HIGH" }).unwrap();
        assert_eq!(json, r#"{"event":"warning","message":"scan found 2 HIGH"}"#);
    }

    #[test]
    fn untimed_success_omits_duration() {
        let event = Event::Success {
            message: "Pushed",
            duration_secs: None,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"success","message":"Pushed"}"#
        );
    }
}
