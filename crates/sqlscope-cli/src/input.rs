//! Input handling for file reading and stdin support.

use sqlscope_core::{strip_cursor_marker, MarkerError};
use std::io::{self, Read};
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::CursorSource;

/// A named SQL buffer read from a file or stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSource {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read from stdin")]
    Stdin(#[source] io::Error),

    #[error("failed to read file: {}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid cursor marker in {name}")]
    Marker {
        name: String,
        #[source]
        source: MarkerError,
    },
}

/// Read SQL input from files or stdin.
///
/// If no files are provided, reads from stdin.
pub fn read_input(files: &[PathBuf]) -> Result<Vec<SqlSource>, InputError> {
    if files.is_empty() {
        read_from_stdin()
    } else {
        read_from_files(files)
    }
}

fn read_from_stdin() -> Result<Vec<SqlSource>, InputError> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .map_err(InputError::Stdin)?;

    Ok(vec![SqlSource {
        name: "<stdin>".to_string(),
        content,
    }])
}

fn read_from_files(files: &[PathBuf]) -> Result<Vec<SqlSource>, InputError> {
    files
        .iter()
        .map(|path| {
            let content = std::fs::read_to_string(path).map_err(|source| InputError::File {
                path: path.clone(),
                source,
            })?;

            Ok(SqlSource {
                name: path.display().to_string(),
                content,
            })
        })
        .collect()
}

/// Resolves the SQL text and cursor offset to analyze for `source`.
///
/// With a marker, the marker is removed from the returned text.
pub fn locate_cursor(
    source: &SqlSource,
    cursor: CursorSource,
) -> Result<(String, usize), InputError> {
    match cursor {
        CursorSource::Offset(offset) => Ok((source.content.clone(), offset)),
        CursorSource::Marker => {
            strip_cursor_marker(&source.content).map_err(|source_err| InputError::Marker {
                name: source.name.clone(),
                source: source_err,
            })
        }
    }
}
