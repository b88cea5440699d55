// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Cross-product of runners, targets and fixture versions.
//!
//! Entries are produced in nested order: runner outer, target middle,
//! version inner. The order is stable so regenerated workflow matrices diff
//! cleanly; it carries no ranking.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{config::MatrixConfig, error::Error, fixtures};

/// One runner/target/version combination executed as a CI job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,)]
pub struct MatrixEntry
{
    /// CI execution environment, for example `ubuntu-latest`.
    pub runner:  String,
    /// Build target variant, for example `local`.
    pub target:  String,
    /// Version string copied verbatim from a fixture.
    pub version: String,
}

/// Ordered collection of matrix entries.
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(transparent)]
pub struct Matrix
{
    entries: Vec<MatrixEntry,>,
}

impl Matrix
{
    /// Entries in emission order.
    pub fn entries(&self,) -> &[MatrixEntry]
    {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self,) -> usize
    {
        self.entries.len()
    }

    /// Returns `true` when no runner contributed any entry.
    pub fn is_empty(&self,) -> bool
    {
        self.entries.is_empty()
    }

    /// Consumes the matrix and returns its entries.
    pub fn into_entries(self,) -> Vec<MatrixEntry,>
    {
        self.entries
    }
}

impl From<Vec<MatrixEntry,>,> for Matrix
{
    fn from(entries: Vec<MatrixEntry,>,) -> Self
    {
        Self {
            entries,
        }
    }
}

/// Versions resolved for one runner, binary-fixture versions first.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct RunnerVersions
{
    /// Runner identifier.
    pub runner:   String,
    /// Operating-system family the fixtures were read for.
    pub os:       String,
    /// Filtered fixture versions in file order.
    pub versions: Vec<String,>,
}

/// Builds the cross-product of already resolved runner versions and targets.
///
/// ```
/// use gomatrix::{RunnerVersions, build_matrix};
///
/// let runners = [RunnerVersions {
///     runner:   "ubuntu-latest".to_owned(),
///     os:       "linux".to_owned(),
///     versions: vec!["1.21".to_owned(), "1.22".to_owned()],
/// }];
/// let matrix = build_matrix(&runners, &["local".to_owned()]);
/// assert_eq!(matrix.len(), 2);
/// assert_eq!(matrix.entries()[1].version, "1.22");
/// ```
pub fn build_matrix(runners: &[RunnerVersions], targets: &[String],) -> Matrix
{
    let capacity = runners.iter().map(|runner| runner.versions.len(),).sum::<usize>() * targets.len();
    let mut entries = Vec::with_capacity(capacity,);

    for runner in runners {
        for target in targets {
            for version in &runner.versions {
                entries.push(MatrixEntry {
                    runner:  runner.runner.clone(),
                    target:  target.clone(),
                    version: version.clone(),
                },);
            }
        }
    }

    Matrix::from(entries,)
}

/// Resolves the fixture versions of every configured runner.
///
/// All runner mappings are checked before the first fixture is read.
///
/// # Errors
///
/// Returns [`Error::UnsupportedRunner`] for a runner without an OS mapping
/// and [`Error::Fixture`] when a fixture cannot be read.
pub fn resolve_runner_versions(
    root: &Path,
    config: &MatrixConfig,
) -> Result<Vec<RunnerVersions,>, Error,>
{
    let mapped = config
        .runners
        .iter()
        .map(|runner| config.os_for(runner,).map(|os| (runner, os,),),)
        .collect::<Result<Vec<_,>, Error,>>()?;

    let mut resolved = Vec::with_capacity(mapped.len(),);
    for (runner, os,) in mapped {
        let versions = fixtures::read_versions(root, &config.fixture_dir, os,)?;
        debug!("Runner {runner} ({os}) has {} versions", versions.len());
        resolved.push(RunnerVersions {
            runner: runner.clone(),
            os: os.to_owned(),
            versions,
        },);
    }

    Ok(resolved,)
}

/// Reads every fixture below `root` and builds the full matrix.
///
/// # Errors
///
/// Propagates errors from [`resolve_runner_versions`]; nothing is built
/// unless every fixture was read.
pub fn generate_matrix(root: &Path, config: &MatrixConfig,) -> Result<Matrix, Error,>
{
    let runners = resolve_runner_versions(root, config,)?;
    let matrix = build_matrix(&runners, &config.targets,);
    info!(
        "Generated {} matrix entries for {} runners and {} targets",
        matrix.len(),
        runners.len(),
        config.targets.len()
    );
    Ok(matrix,)
}
