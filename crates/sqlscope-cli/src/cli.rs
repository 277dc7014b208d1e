//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// sqlscope - cursor-aware SQL context analyzer
#[derive(Parser, Debug)]
#[command(name = "sqlscope")]
#[command(
    about = "Report the SQL completion context at a cursor, or split SQL into statements",
    long_about = None
)]
#[command(version)]
pub struct Args {
    /// SQL files to analyze (reads from stdin if none provided)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Cursor position as a byte offset into each input
    #[arg(long, value_name = "OFFSET", conflicts_with_all = ["marker", "split"])]
    pub cursor: Option<usize>,

    /// Take the cursor position from a single '|' in each input and remove it
    #[arg(short, long, conflicts_with = "split")]
    pub marker: bool,

    /// Split input into statements instead of analyzing a cursor
    #[arg(long)]
    pub split: bool,

    /// Statement count reported by the engine; pads or truncates the split
    #[arg(long, value_name = "N", requires = "split")]
    pub expected: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Print the JSON schema of the context result and exit
    #[arg(long)]
    pub json_schema: bool,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// What the invocation asks for, or `None` if no mode was selected.
    pub fn mode(&self) -> Option<Mode> {
        if self.json_schema {
            Some(Mode::JsonSchema)
        } else if self.split {
            Some(Mode::Split {
                expected: self.expected,
            })
        } else if self.marker {
            Some(Mode::Context(CursorSource::Marker))
        } else {
            self.cursor
                .map(|offset| Mode::Context(CursorSource::Offset(offset)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorSource {
    Offset(usize),
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Context(CursorSource),
    Split { expected: Option<usize> },
    JsonSchema,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}
