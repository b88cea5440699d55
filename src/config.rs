// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Configuration document describing which runners and targets make up the
//! build matrix.
//!
//! The built-in defaults reproduce the matrix used by the repository's own
//! workflows. A YAML document may override any subset of the keys; omitted
//! keys keep their defaults. Every loaded document is validated before use.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{self, Error};

/// Directory, relative to the checkout root, that holds the fixture files.
pub const DEFAULT_FIXTURE_DIR: &str = ".testdata";
/// Runners in emission order, paired with the OS family used in fixture
/// names.
const DEFAULT_RUNNERS: &[(&str, &str,)] = &[("ubuntu-latest", "linux",), ("macos-latest", "darwin",)];
// arm targets are not wired up in the workflows yet.
const DEFAULT_TARGETS: &[&str] = &["local"];

/// Runner, target and fixture layout used to generate the matrix.
///
/// # Examples
///
/// ```
/// use gomatrix::MatrixConfig;
///
/// let config = MatrixConfig::default();
/// assert_eq!(config.runners, ["ubuntu-latest", "macos-latest"]);
/// assert_eq!(config.os_for("macos-latest").unwrap(), "darwin");
/// assert_eq!(config.targets, ["local"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct MatrixConfig
{
    /// Fixture directory relative to the checkout root.
    #[serde(default = "default_fixture_dir")]
    pub fixture_dir: PathBuf,

    /// Runner identifiers in emission order.
    #[serde(default = "default_runners")]
    pub runners: Vec<String,>,

    /// Operating-system family for every runner, used as the fixture file
    /// suffix.
    #[serde(default = "default_runner_os", alias = "runner-os", alias = "runnerOs")]
    pub runner_os: BTreeMap<String, String,>,

    /// Build target identifiers in emission order.
    #[serde(default = "default_targets")]
    pub targets: Vec<String,>,
}

impl Default for MatrixConfig
{
    fn default() -> Self
    {
        Self {
            fixture_dir: default_fixture_dir(),
            runners:     default_runners(),
            runner_os:   default_runner_os(),
            targets:     default_targets(),
        }
    }
}

impl MatrixConfig
{
    /// Returns the operating-system family mapped to `runner`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedRunner`] when the runner has no mapping.
    pub fn os_for(&self, runner: &str,) -> Result<&str, Error,>
    {
        self.runner_os
            .get(runner,)
            .map(String::as_str,)
            .ok_or_else(|| Error::unsupported_runner(runner,),)
    }

    /// Checks the invariants the matrix builder relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when runners or targets are empty, blank
    /// or duplicated, when an OS family cannot be used as a file name
    /// suffix, or when the fixture directory escapes the checkout root.
    pub fn validate(&self,) -> Result<(), Error,>
    {
        ensure_relative_fixture_dir(&self.fixture_dir,)?;
        ensure_unique_identifiers("runners", &self.runners,)?;
        ensure_unique_identifiers("targets", &self.targets,)?;

        for (runner, os,) in &self.runner_os {
            let trimmed = os.trim();
            if trimmed.is_empty() || trimmed != os.as_str() {
                return Err(Error::validation(format!(
                    "runner_os entry for '{runner}' must be a non-blank identifier without \
                     surrounding whitespace"
                ),),);
            }
            if os.contains(['/', '\\',],) || os == "." || os == ".." {
                return Err(Error::validation(format!(
                    "runner_os entry for '{runner}' must not contain path components"
                ),),);
            }
        }

        Ok((),)
    }
}

/// Loads and validates a configuration document from `path`.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or the document fails validation.
pub fn load_config(path: &Path,) -> Result<MatrixConfig, Error,>
{
    debug!("Reading matrix configuration from {}", path.display());
    let contents = fs::read_to_string(path,).map_err(|source| error::config_error(path, source,),)?;
    parse_config(&contents,)
}

/// Parses and validates a configuration document.
///
/// An empty document yields the defaults.
///
/// # Errors
///
/// Propagates [`Error::Parse`] when the YAML cannot be decoded and
/// [`Error::Validation`] when invariants are violated.
pub fn parse_config(contents: &str,) -> Result<MatrixConfig, Error,>
{
    let config = if contents.trim().is_empty() {
        MatrixConfig::default()
    } else {
        serde_yaml::from_str::<MatrixConfig,>(contents,)?
    };

    config.validate()?;
    Ok(config,)
}

fn ensure_unique_identifiers(field: &str, values: &[String],) -> Result<(), Error,>
{
    if values.is_empty() {
        return Err(Error::validation(format!("{field} must include at least one entry"),),);
    }

    let mut seen = HashSet::with_capacity(values.len(),);
    for value in values {
        if value.trim().is_empty() {
            return Err(Error::validation(format!("{field} cannot contain blank entries"),),);
        }
        if value.trim() != value.as_str() {
            return Err(Error::validation(format!(
                "entry '{value}' in {field} must not have surrounding whitespace"
            ),),);
        }
        if !seen.insert(value.as_str(),) {
            return Err(Error::validation(format!("duplicate entry '{value}' in {field}"),),);
        }
    }

    Ok((),)
}

fn ensure_relative_fixture_dir(dir: &Path,) -> Result<(), Error,>
{
    let escapes = dir
        .components()
        .any(|component| !matches!(component, Component::Normal(_,) | Component::CurDir),);
    if escapes {
        return Err(Error::validation(format!(
            "fixture_dir '{}' must be a relative path inside the checkout",
            dir.display()
        ),),);
    }

    Ok((),)
}

fn default_fixture_dir() -> PathBuf
{
    PathBuf::from(DEFAULT_FIXTURE_DIR,)
}

fn default_runners() -> Vec<String,>
{
    DEFAULT_RUNNERS.iter().map(|(runner, _,)| (*runner).to_owned(),).collect()
}

fn default_runner_os() -> BTreeMap<String, String,>
{
    DEFAULT_RUNNERS
        .iter()
        .map(|(runner, os,)| ((*runner).to_owned(), (*os).to_owned(),),)
        .collect()
}

fn default_targets() -> Vec<String,>
{
    DEFAULT_TARGETS.iter().map(|target| (*target).to_owned(),).collect()
}
