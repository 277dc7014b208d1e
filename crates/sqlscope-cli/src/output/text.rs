//! Human-readable text output formatting.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use sqlscope_core::{SegmentResult, SqlContext, TableKind};
use std::fmt::Write;

fn use_color(use_colors: bool) -> bool {
    use_colors && std::io::stdout().is_terminal()
}

fn write_header(out: &mut String, title: &str, colored: bool) {
    let line = "═".repeat(50);

    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
        writeln!(out, "{}", line.dimmed()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
        writeln!(out, "{line}").unwrap();
    }
}

fn write_label(out: &mut String, label: &str, value: &str, colored: bool) {
    if colored {
        writeln!(out, "{} {value}", format!("{label}:").cyan()).unwrap();
    } else {
        writeln!(out, "{label}: {value}").unwrap();
    }
}

/// Format a cursor context as text with optional colors.
pub fn format_context_text(name: &str, context: &SqlContext, use_colors: bool) -> String {
    let colored = use_color(use_colors);
    let mut out = String::new();

    write_header(&mut out, name, colored);
    write_label(&mut out, "Clause", context.clause.as_str(), colored);
    write_label(
        &mut out,
        "Statement",
        &format!(
            "#{} (bytes {}..{})",
            context.statement_index + 1,
            context.statement_span.start,
            context.statement_span.end
        ),
        colored,
    );
    write_label(
        &mut out,
        "Scope",
        &format!(
            "bytes {}..{}",
            context.scope_span.start, context.scope_span.end
        ),
        colored,
    );

    let mut prefix = format!("{:?}", context.prefix);
    if let Some(dot_prefix) = &context.dot_prefix {
        write!(
            prefix,
            " after {dot_prefix:?} (qualified {:?}, {} bytes typed)",
            context.full_qualified_prefix, context.raw_qualified_prefix_length
        )
        .unwrap();
    }
    write_label(&mut out, "Prefix", &prefix, colored);

    if let Some(quote) = &context.quote_context {
        write_label(
            &mut out,
            "Quote",
            &format!(
                "{} opened at byte {}, typed {:?}",
                quote.quote_char, quote.quote_start, quote.path_prefix
            ),
            colored,
        );
    }

    writeln!(out).unwrap();
    write_tables(&mut out, context, colored);
    write_ctes(&mut out, context, colored);

    out
}

fn write_section(out: &mut String, title: &str, colored: bool) {
    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
    }
}

fn write_tables(out: &mut String, context: &SqlContext, colored: bool) {
    if context.tables.is_empty() {
        return;
    }

    write_section(out, "Tables:", colored);
    for table in &context.tables {
        let kind = match table.kind {
            TableKind::Table => "table",
            TableKind::File => "file",
            TableKind::Function => "function",
            TableKind::Subquery => "subquery",
        };
        let kind = if colored {
            format!("[{kind}]").dimmed().to_string()
        } else {
            format!("[{kind}]")
        };
        match &table.alias {
            Some(alias) => writeln!(out, "  {} AS {alias} {kind}", table.name).unwrap(),
            None => writeln!(out, "  {} {kind}", table.name).unwrap(),
        }
    }
    writeln!(out).unwrap();
}

fn write_ctes(out: &mut String, context: &SqlContext, colored: bool) {
    if context.ctes.is_empty() {
        return;
    }

    write_section(out, "CTEs:", colored);
    for cte in &context.ctes {
        writeln!(out, "  {}", cte.name).unwrap();
    }
    writeln!(out).unwrap();
}

/// Format a statement split as a numbered list with optional colors.
pub fn format_segments_text(name: &str, result: &SegmentResult, use_colors: bool) -> String {
    let colored = use_color(use_colors);
    let mut out = String::new();

    write_header(&mut out, name, colored);
    let summary = format!(
        "{} found, {} returned",
        result.found_count,
        result.statements.len()
    );
    write_label(&mut out, "Statements", &summary, colored);
    writeln!(out).unwrap();

    for (index, statement) in result.statements.iter().enumerate() {
        let number = format!("{:>3}.", index + 1);
        let number = if colored {
            number.green().to_string()
        } else {
            number
        };
        let placeholder = index >= result.found_count;
        let body = statement.lines().collect::<Vec<_>>().join("\n     ");
        if placeholder && colored {
            writeln!(out, "{number} {}", body.dimmed()).unwrap();
        } else if placeholder {
            writeln!(out, "{number} {body} (placeholder)").unwrap();
        } else {
            writeln!(out, "{number} {body}").unwrap();
        }
    }

    out
}
