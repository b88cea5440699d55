// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Readers for the checked-in version fixtures.
//!
//! Every operating-system family has two fixtures: versions exercised as
//! prebuilt sample binaries and versions built from source. Both are plain
//! text with one version per line; blank lines and `#` comments are ignored.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{self, Error};

/// Kinds of fixture files kept per operating-system family, in read order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash,)]
pub enum FixtureKind
{
    /// Versions exercised through prebuilt sample binaries.
    SampleBinary,
    /// Versions built from source.
    Source,
}

impl FixtureKind
{
    /// Fixture kinds in the order their versions are emitted.
    pub const ALL: [FixtureKind; 2] = [FixtureKind::SampleBinary, FixtureKind::Source];

    /// File name prefix shared by every fixture of this kind.
    pub fn prefix(self,) -> &'static str
    {
        match self {
            Self::SampleBinary => "sample-binary",
            Self::Source => "source",
        }
    }

    /// File name of the fixture for the provided OS family.
    ///
    /// ```
    /// use gomatrix::FixtureKind;
    ///
    /// assert_eq!(FixtureKind::SampleBinary.file_name("linux"), "sample-binary-linux");
    /// assert_eq!(FixtureKind::Source.file_name("darwin"), "source-darwin");
    /// ```
    pub fn file_name(self, os: &str,) -> String
    {
        format!("{}-{os}", self.prefix())
    }
}

/// Returns the location of a fixture below the checkout root.
pub fn fixture_path(root: &Path, fixture_dir: &Path, kind: FixtureKind, os: &str,) -> PathBuf
{
    root.join(fixture_dir,).join(kind.file_name(os,),)
}

/// Reads every version listed for `os`, sample-binary versions first.
///
/// # Errors
///
/// Returns [`Error::Fixture`] naming the first fixture that cannot be read.
pub fn read_versions(root: &Path, fixture_dir: &Path, os: &str,) -> Result<Vec<String,>, Error,>
{
    let mut versions = Vec::new();
    for kind in FixtureKind::ALL {
        let path = fixture_path(root, fixture_dir, kind, os,);
        versions.extend(read_fixture(&path,)?,);
    }

    Ok(versions,)
}

/// Reads a single fixture and returns its filtered lines in file order.
///
/// # Errors
///
/// Returns [`Error::Fixture`] when the file is missing, unreadable or not
/// valid UTF-8.
pub fn read_fixture(path: &Path,) -> Result<Vec<String,>, Error,>
{
    let contents = fs::read_to_string(path,).map_err(|source| error::fixture_error(path, source,),)?;
    let versions = filter_versions(&contents,);
    debug!("Read {} versions from {}", versions.len(), path.display());
    Ok(versions,)
}

/// Trims every line and drops blank lines and `#` comments.
///
/// ```
/// use gomatrix::filter_versions;
///
/// let versions = filter_versions("1.20\n# comment\n\n  1.21  \n");
/// assert_eq!(versions, ["1.20", "1.21"]);
/// ```
pub fn filter_versions(contents: &str,) -> Vec<String,>
{
    contents
        .lines()
        .map(str::trim,)
        .filter(|line| !line.is_empty() && !line.starts_with('#',),)
        .map(str::to_owned,)
        .collect()
}
