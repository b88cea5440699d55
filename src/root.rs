// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Checkout root discovery through `git rev-parse --show-toplevel`.
//!
//! The git child is raced against SIGINT/SIGTERM and killed as soon as a
//! signal arrives. A missing checkout is a configuration error, so nothing is
//! retried.

use std::{
    future::Future,
    path::{Path, PathBuf},
    process::Stdio,
};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::Error;

const GIT_PROGRAM: &str = "git";

/// Returns the top-level directory of the checkout containing `dir`, or the
/// process working directory when `dir` is `None`.
///
/// # Errors
///
/// Returns [`Error::GitSpawn`] when git cannot be started, [`Error::Git`]
/// when it exits unsuccessfully or prints no path, and
/// [`Error::Interrupted`] when a termination signal arrives first.
///
/// # Example
///
/// ```no_run
/// use gomatrix::resolve_repository_root;
///
/// # async fn example() -> Result<(), gomatrix::Error> {
/// let root = resolve_repository_root(None,).await?;
/// println!("checkout root: {}", root.display());
/// # Ok(())
/// # }
/// ```
pub async fn resolve_repository_root(dir: Option<&Path,>,) -> Result<PathBuf, Error,>
{
    show_toplevel(GIT_PROGRAM, dir, shutdown_signal(),).await
}

async fn show_toplevel<S,>(
    program: &str,
    dir: Option<&Path,>,
    shutdown: S,
) -> Result<PathBuf, Error,>
where
    S: Future<Output = (),>,
{
    let mut command = Command::new(program,);
    command.args(["rev-parse", "--show-toplevel"],).stdin(Stdio::null(),).kill_on_drop(true,);
    if let Some(dir,) = dir {
        command.current_dir(dir,);
    }

    debug!("Running {program} rev-parse --show-toplevel");
    let output = tokio::select! {
        biased;
        () = shutdown => return Err(Error::Interrupted),
        output = command.output() => output.map_err(|source| Error::GitSpawn { source },)?,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr,);
        return Err(Error::git(format!("{} ({})", stderr.trim(), output.status),),);
    }

    let top = String::from_utf8_lossy(&output.stdout,).trim().to_owned();
    if top.is_empty() {
        return Err(Error::git("git reported an empty checkout path",),);
    }

    debug!("Resolved checkout root {top}");
    Ok(PathBuf::from(top,),)
}

async fn shutdown_signal()
{
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (signal(SignalKind::terminate(),), signal(SignalKind::interrupt(),),) {
            (Ok(mut sigterm,), Ok(mut sigint,),) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            (Err(error,), _,) | (_, Err(error,),) => {
                warn!("failed to register signal handlers: {error}");
                std::future::pending::<(),>().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(error,) = tokio::signal::ctrl_c().await {
            warn!("failed to register Ctrl-C handler: {error}");
            std::future::pending::<(),>().await;
        }
    }
}
