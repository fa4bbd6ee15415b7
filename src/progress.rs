//! Import progress reporting.
//!
//! Reports observable progress during `kbr import` so users see how many
//! lines were read and how many records are stored. Progress is emitted on
//! **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A single progress event for an import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportProgressEvent {
    /// Source file is being read.
    Reading { source: String },
    /// Records parsed from the source and queued for storage.
    Parsed { source: String, n: u64, total: u64 },
    /// Records written to the knowledge store.
    Stored { source: String, stored: u64 },
}

/// Reports import progress. Implementations write to stderr (human or JSON).
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ImportProgressEvent);
}

/// Human-friendly progress on stderr: "import notes.txt  parsed  1,234 / 5,000 lines".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: ImportProgressEvent) {
        let line = match &event {
            ImportProgressEvent::Reading { source } => {
                format!("import {}  reading...\n", source)
            }
            ImportProgressEvent::Parsed { source, n, total } => format!(
                "import {}  parsed  {} / {} lines\n",
                source,
                format_number(*n),
                format_number(*total)
            ),
            ImportProgressEvent::Stored { source, stored } => {
                format!("import {}  stored  {} records\n", source, format_number(*stored))
            }
        };
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: ImportProgressEvent) {
        let obj = match &event {
            ImportProgressEvent::Reading { source } => serde_json::json!({
                "event": "progress",
                "source": source,
                "phase": "reading"
            }),
            ImportProgressEvent::Parsed { source, n, total } => serde_json::json!({
                "event": "progress",
                "source": source,
                "phase": "parsed",
                "n": n,
                "total": total
            }),
            ImportProgressEvent::Stored { source, stored } => serde_json::json!({
                "event": "progress",
                "source": source,
                "phase": "stored",
                "stored": stored
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{}", line);
            let _ = err.flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: ImportProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
