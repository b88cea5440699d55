// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Serialization of the matrix to standard output or the GitHub Actions
//! output file.
//!
//! The payload is always fully rendered before any destination is opened,
//! so a serialization failure never leaves a truncated output file behind.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    error::{self, Error},
    matrix::Matrix,
};

/// Environment variable GitHub Actions uses to name the step output file.
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";
/// Output key the matrix is published under.
pub const OUTPUT_KEY: &str = "env";
/// Delimiter closing the multi-line output value.
pub const HEREDOC_DELIMITER: &str = "EOF";

/// Where the rendered matrix is written.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum OutputDestination
{
    /// Raw JSON on standard output.
    Stdout,
    /// Heredoc-wrapped JSON in the GitHub Actions output file.
    GithubOutput(PathBuf,),
}

impl OutputDestination
{
    /// Selects the destination from the captured `GITHUB_OUTPUT` value.
    ///
    /// ```
    /// use std::path::PathBuf;
    ///
    /// use gomatrix::OutputDestination;
    ///
    /// assert_eq!(OutputDestination::from_github_output(None), OutputDestination::Stdout);
    /// assert_eq!(
    ///     OutputDestination::from_github_output(Some(PathBuf::from("/tmp/out"))),
    ///     OutputDestination::GithubOutput(PathBuf::from("/tmp/out")),
    /// );
    /// ```
    pub fn from_github_output(path: Option<PathBuf,>,) -> Self
    {
        match path {
            Some(path,) => Self::GithubOutput(path,),
            None => Self::Stdout,
        }
    }

    /// Framing applied to the payload for this destination.
    pub fn format(&self,) -> OutputFormat
    {
        match self {
            Self::Stdout => OutputFormat::Json,
            Self::GithubOutput(_,) => OutputFormat::GithubHeredoc,
        }
    }
}

/// Framing applied around the JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum OutputFormat
{
    /// Bare JSON followed by a newline.
    Json,
    /// `env<<EOF`, the JSON, then a closing `EOF` line.
    GithubHeredoc,
}

/// Renders the matrix as two-space indented JSON followed by a newline.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when encoding fails.
pub fn render_json(matrix: &Matrix,) -> Result<String, Error,>
{
    let mut payload = serde_json::to_string_pretty(matrix,)?;
    payload.push('\n',);
    Ok(payload,)
}

/// Writes an already rendered payload with the requested framing.
///
/// # Errors
///
/// Returns [`Error::HeredocDelimiter`] when a heredoc payload contains the
/// delimiter line, and the writer's I/O error mapped through `on_io`
/// otherwise.
pub fn write_payload<W, F,>(
    writer: &mut W,
    payload: &str,
    format: OutputFormat,
    on_io: F,
) -> Result<(), Error,>
where
    W: Write,
    F: Fn(io::Error,) -> Error,
{
    match format {
        OutputFormat::Json => writer.write_all(payload.as_bytes(),).map_err(&on_io,)?,
        OutputFormat::GithubHeredoc => {
            if payload.lines().any(|line| line == HEREDOC_DELIMITER,) {
                return Err(Error::HeredocDelimiter {
                    delimiter: HEREDOC_DELIMITER.to_owned(),
                },);
            }
            write!(writer, "{OUTPUT_KEY}<<{HEREDOC_DELIMITER}\n{payload}{HEREDOC_DELIMITER}\n")
                .map_err(&on_io,)?;
        }
    }

    writer.flush().map_err(on_io,)
}

/// Renders the matrix and writes it to `destination`.
///
/// The output file, when used, is created (or truncated) only after the
/// payload has been rendered and is closed on every return path.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when encoding fails, [`Error::Output`] when
/// the output file cannot be created or written, and [`Error::Stdout`] when
/// standard output rejects the write.
pub fn emit(matrix: &Matrix, destination: &OutputDestination,) -> Result<(), Error,>
{
    let payload = render_json(matrix,)?;

    match destination {
        OutputDestination::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_payload(&mut handle, &payload, destination.format(), |source| Error::Stdout {
                source,
            },)
        }
        OutputDestination::GithubOutput(path,) => {
            write_output_file(path, &payload, destination.format(),)?;
            info!("Wrote {} matrix entries to {}", matrix.len(), path.display());
            Ok((),)
        }
    }
}

fn write_output_file(path: &Path, payload: &str, format: OutputFormat,) -> Result<(), Error,>
{
    let file = File::create(path,).map_err(|source| error::output_error(path, source,),)?;
    let mut writer = BufWriter::new(file,);
    write_payload(&mut writer, payload, format, |source| error::output_error(path, source,),)
}
