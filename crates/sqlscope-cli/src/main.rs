//! sqlscope CLI - cursor-aware SQL context analyzer

use sqlscope_cli::cli;
use sqlscope_cli::input;
use sqlscope_cli::output;

use anyhow::{Context, Result};
use clap::Parser;
use sqlscope_core::{analyze_context, segment_for_request, SegmentRequest};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use cli::{Args, CursorSource, Mode, OutputFormat};
use input::SqlSource;
use output::{format_context_text, format_named_json, format_segments_text, json_schema};

/// Configuration error (e.g. missing mode or unreadable input).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sqlscope: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let Some(mode) = args.mode() else {
        anyhow::bail!("one of --cursor, --marker, --split or --json-schema is required");
    };

    let output_str = match mode {
        Mode::JsonSchema => json_schema(args.compact),
        Mode::Context(cursor) => {
            let sources = input::read_input(&args.files)?;
            run_context(&args, &sources, cursor)?
        }
        Mode::Split { expected } => {
            let sources = input::read_input(&args.files)?;
            run_split(&args, &sources, expected)
        }
    };

    write_output(&args.output, &output_str)
}

fn run_context(args: &Args, sources: &[SqlSource], cursor: CursorSource) -> Result<String> {
    let mut results = Vec::with_capacity(sources.len());
    for source in sources {
        let (sql, offset) = input::locate_cursor(source, cursor)?;
        if !args.quiet && offset > sql.len() {
            eprintln!(
                "sqlscope: warning: cursor {offset} is past the end of {} ({} bytes), clamping",
                source.name,
                sql.len()
            );
        }
        results.push((source.name.clone(), analyze_context(&sql, offset)));
    }

    Ok(match args.format {
        OutputFormat::Json => format_named_json(&results, args.compact),
        OutputFormat::Text => results
            .iter()
            .map(|(name, context)| format_context_text(name, context, !args.quiet))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn run_split(args: &Args, sources: &[SqlSource], expected: Option<usize>) -> String {
    let results: Vec<_> = sources
        .iter()
        .map(|source| {
            let result = segment_for_request(&SegmentRequest {
                sql: source.content.clone(),
                expected_count: expected,
            });
            if !args.quiet && result.reconciled {
                eprintln!(
                    "sqlscope: warning: {} has {} statements, expected {}",
                    source.name,
                    result.found_count,
                    result.statements.len()
                );
            }
            (source.name.clone(), result)
        })
        .collect();

    match args.format {
        OutputFormat::Json => format_named_json(&results, args.compact),
        OutputFormat::Text => results
            .iter()
            .map(|(name, result)| format_segments_text(name, result, !args.quiet))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
