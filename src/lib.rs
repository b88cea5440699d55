// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Build-matrix generation for GitHub Actions workflows.
//!
//! The library resolves the checkout root, reads the version fixtures kept
//! below it, expands them into runner/target/version entries and emits the
//! result as indented JSON, either on standard output or as a heredoc block
//! in the file named by `GITHUB_OUTPUT`.

mod config;
mod emit;
mod error;
mod fixtures;
mod matrix;
mod root;

pub use config::{DEFAULT_FIXTURE_DIR, MatrixConfig, load_config, parse_config};
pub use emit::{
    GITHUB_OUTPUT_ENV, HEREDOC_DELIMITER, OUTPUT_KEY, OutputDestination, OutputFormat, emit,
    render_json, write_payload,
};
pub use error::{Error, config_error, fixture_error, output_error};
pub use fixtures::{FixtureKind, filter_versions, fixture_path, read_fixture, read_versions};
pub use matrix::{
    Matrix, MatrixEntry, RunnerVersions, build_matrix, generate_matrix, resolve_runner_versions,
};
pub use root::resolve_repository_root;
