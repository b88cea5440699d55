// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the gomatrix binary.
//!
//! Invoked without arguments inside a checkout, the binary prints the build
//! matrix as JSON, or writes it to `$GITHUB_OUTPUT` when running under GitHub
//! Actions.

use std::{io, path::PathBuf, process};

use clap::{ArgAction, Parser};
use gomatrix::{
    Error, GITHUB_OUTPUT_ENV, MatrixConfig, OutputDestination, emit, generate_matrix,
    load_config, resolve_repository_root,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Command line interface for generating the CI build matrix.
#[derive(Debug, Parser,)]
#[command(name = "gomatrix", version, about = "Generate the CI build matrix from version fixtures")]
struct Cli
{
    /// YAML document overriding runners, targets and the fixture directory.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf,>,

    /// Checkout root to read fixtures from instead of asking git.
    #[arg(long = "root", value_name = "DIR")]
    root: Option<PathBuf,>,

    /// GitHub Actions output file that receives the heredoc-wrapped matrix.
    #[arg(long = "github-output", value_name = "PATH", env = GITHUB_OUTPUT_ENV)]
    github_output: Option<PathBuf,>,

    /// Emit debug logs on stderr.
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main(flavor = "current_thread")]
async fn main()
{
    let cli = Cli::parse();
    init_tracing(cli.verbose,);

    if let Err(error,) = run(cli,).await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

/// Logs go to stderr; stdout is reserved for the matrix.
fn init_tracing(verbose: bool,)
{
    let default_directive = if verbose { "gomatrix=debug" } else { "gomatrix=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive,),);

    tracing_subscriber::registry()
        .with(filter,)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr,)
                .with_target(false,)
                .compact(),
        )
        .init();
}

/// Resolves inputs, builds the matrix and emits it.
///
/// # Errors
///
/// Propagates the first failure of any stage; nothing is written unless the
/// whole matrix was built.
async fn run(cli: Cli,) -> Result<(), Error,>
{
    let config = match cli.config.as_deref() {
        Some(path,) => load_config(path,)?,
        None => MatrixConfig::default(),
    };
    let destination = OutputDestination::from_github_output(cli.github_output,);

    let root = match cli.root {
        Some(root,) => root,
        None => resolve_repository_root(None,).await?,
    };
    debug!("Reading fixtures below {}", root.display());

    let matrix = generate_matrix(&root, &config,)?;
    emit(&matrix, &destination,)
}

#[cfg(test)]
mod tests
{
    use std::{fs, path::Path};

    use clap::Parser;
    use tempfile::{TempDir, tempdir};

    use super::{Cli, run};

    fn checkout_with_fixtures(files: &[(&str, &str,)],) -> TempDir
    {
        let root = tempdir().expect("failed to create tempdir",);
        let dir = root.path().join(".testdata",);
        fs::create_dir_all(&dir,).expect("failed to create fixture dir",);
        for (name, contents,) in files {
            fs::write(dir.join(name,), contents,).expect("failed to write fixture",);
        }
        root
    }

    fn cli(root: &Path, github_output: &Path, config: Option<&Path,>,) -> Cli
    {
        Cli {
            config:        config.map(Path::to_path_buf,),
            root:          Some(root.to_path_buf(),),
            github_output: Some(github_output.to_path_buf(),),
            verbose:       false,
        }
    }

    #[test]
    fn cli_accepts_invocation_without_arguments()
    {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME")],).expect("failed to parse CLI",);

        assert!(cli.config.is_none());
        assert!(cli.root.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_accepts_explicit_github_output()
    {
        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            "--github-output",
            "/tmp/github_output",
            "--root",
            "/repo",
            "-v",
        ],)
        .expect("failed to parse CLI",);

        assert_eq!(cli.github_output.as_deref(), Some(Path::new("/tmp/github_output")));
        assert_eq!(cli.root.as_deref(), Some(Path::new("/repo")));
        assert!(cli.verbose);
    }

    #[tokio::test]
    async fn run_writes_heredoc_matrix_for_default_runners()
    {
        let root = checkout_with_fixtures(&[
            ("sample-binary-linux", "1.20\n# comment\n\n1.21",),
            ("source-linux", "1.22",),
            ("sample-binary-darwin", "",),
            ("source-darwin", "# none\n",),
        ],);
        let output = root.path().join("github_output",);

        run(cli(root.path(), &output, None,),).await.expect("run failed",);

        let contents = fs::read_to_string(&output,).expect("output file exists",);
        let json = contents
            .strip_prefix("env<<EOF\n",)
            .and_then(|rest| rest.strip_suffix("\nEOF\n",),)
            .expect("heredoc framing",);
        let entries: Vec<serde_json::Value,> = serde_json::from_str(json,).expect("valid JSON",);
        let versions: Vec<&str,> =
            entries.iter().map(|entry| entry["version"].as_str().expect("string version",),).collect();

        assert_eq!(versions, ["1.20", "1.21", "1.22"]);
        assert!(entries.iter().all(|entry| entry["runner"] == "ubuntu-latest"
            && entry["target"] == "local"));
    }

    #[tokio::test]
    async fn run_leaves_no_output_file_when_fixture_missing()
    {
        let root = checkout_with_fixtures(&[
            ("sample-binary-linux", "1.20\n",),
            ("source-linux", "1.21\n",),
            ("sample-binary-darwin", "1.20\n",),
        ],);
        let output = root.path().join("github_output",);

        let error = run(cli(root.path(), &output, None,),).await.expect_err("fixture is missing",);

        assert!(matches!(error, gomatrix::Error::Fixture { .. }));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn run_applies_configuration_overrides()
    {
        let root = tempdir().expect("failed to create tempdir",);
        let fixtures = root.path().join("fixtures",);
        fs::create_dir_all(&fixtures,).expect("failed to create fixture dir",);
        fs::write(fixtures.join("sample-binary-windows",), "1.22\n",).expect("write",);
        fs::write(fixtures.join("source-windows",), "",).expect("write",);

        let config = root.path().join("matrix.yaml",);
        fs::write(
            &config,
            "fixture_dir: fixtures\nrunners: [windows-latest]\nrunner_os:\n  windows-latest: \
             windows\ntargets: [local, arm64]\n",
        )
        .expect("failed to write config",);
        let output = root.path().join("github_output",);

        run(cli(root.path(), &output, Some(&config,),),).await.expect("run failed",);

        let contents = fs::read_to_string(&output,).expect("output file exists",);
        assert!(contents.contains("\"runner\": \"windows-latest\""));
        assert!(contents.contains("\"target\": \"arm64\""));
    }

    #[tokio::test]
    async fn run_rejects_runner_without_os_mapping()
    {
        let root = checkout_with_fixtures(&[],);
        let config = root.path().join("matrix.yaml",);
        fs::write(&config, "runners: [ubuntu-latest, windows-latest]\n",).expect("write",);
        let output = root.path().join("github_output",);

        let error =
            run(cli(root.path(), &output, Some(&config,),),).await.expect_err("runner is unmapped",);

        assert!(matches!(error, gomatrix::Error::UnsupportedRunner { .. }));
        assert!(!output.exists());
    }
}
