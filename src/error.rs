#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the matrix generator."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint, so the lint is disabled
//! for the module.

use std::path::{Path, PathBuf};

/// Unified error type returned by every stage of matrix generation.
///
/// None of the variants are recoverable: the CLI prints the display string
/// and exits with a non-zero status. Path-carrying variants are usually
/// built through [`fixture_error`], [`output_error`] and [`config_error`].
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// The `git` executable could not be spawned.
    #[error("failed to run git: {source}")]
    GitSpawn {
        /// Underlying spawn error.
        source: std::io::Error
    },
    /// `git` ran but did not report a usable checkout root.
    #[error("git rev-parse --show-toplevel failed: {message}")]
    Git {
        /// Diagnostic captured from git's stderr or describing the output.
        message: String
    },
    /// An interrupt or termination signal arrived while git was running.
    #[error("interrupted while resolving the repository root")]
    Interrupted,
    /// A fixture file could not be read.
    #[error("failed to read fixture {path:?}: {source}")]
    Fixture {
        /// Location of the fixture file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// The CI output file could not be created or written.
    #[error("failed to write output file {path:?}: {source}")]
    Output {
        /// Location of the output file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Writing to standard output failed.
    #[error("failed to write to stdout: {source}")]
    Stdout {
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps serialization errors when encoding the matrix.
    #[error("failed to serialize matrix: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// The configuration file could not be read.
    #[error("failed to read configuration from {path:?}: {source}")]
    Config {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when the configuration or output violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// The rendered payload contains a line equal to the heredoc delimiter.
    #[error("matrix payload contains the heredoc delimiter line '{delimiter}'")]
    HeredocDelimiter {
        /// Delimiter that would terminate the output value early.
        delimiter: String
    },
    /// A runner has no operating-system mapping.
    #[error("unsupported runner '{runner}': no operating system mapping")]
    UnsupportedRunner {
        /// Runner identifier that was looked up.
        runner: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a git failure from the provided message.
    pub fn git<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Git {
            message: message.into()
        }
    }

    /// Constructs an unsupported-runner error.
    pub fn unsupported_runner<R>(runner: R) -> Self
    where
        R: Into<String>
    {
        Self::UnsupportedRunner {
            runner: runner.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation
    /// and is what the CLI prints before exiting.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Fixture`] variant capturing the failing path and
/// source.
pub fn fixture_error(path: &Path, source: std::io::Error) -> Error {
    Error::Fixture {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Output`] variant capturing the failing path and
/// source.
pub fn output_error(path: &Path, source: std::io::Error) -> Error {
    Error::Output {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Config`] variant capturing the failing path and
/// source.
pub fn config_error(path: &Path, source: std::io::Error) -> Error {
    Error::Config {
        path: path.to_path_buf(),
        source
    }
}
