//! Namespace entry and final exec

use std::ffi::CString;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use nsdive_core::{KindSet, NsTarget};
use nsdive_session::SessionGroup;

use crate::cli::Cli;

const DEFAULT_COMMAND: &str = "/bin/sh";

pub fn execute(cli: &Cli) -> Result<()> {
    let kinds = cli.kinds();
    validate_kinds(&kinds)?;

    let target = NsTarget::process(&cli.target);
    debug!(target = %target, kinds = ?kinds.kinds(), "entering namespaces");

    let mut group = SessionGroup::open_at(&cli.proc, target, &kinds)
        .context("Failed to resolve namespaces")?;

    // A partial entry is rolled back inside enter_all before this propagates
    group
        .enter_all()
        .context("Failed to enter namespaces")?;

    let argv = build_argv(&cli.command)?;

    // execvp only ever returns on failure; restore the namespaces before
    // reporting it so the caller is never left half-switched.
    match nix::unistd::execvp(&argv[0], &argv) {
        Ok(never) => match never {},
        Err(errno) => {
            if let Err(e) = group.exit_all() {
                warn!(error = %e, "failed to restore namespaces after exec failure");
            }
            Err(errno).with_context(|| {
                format!("Failed to execute {}", argv[0].to_string_lossy())
            })
        }
    }
}

fn validate_kinds(kinds: &KindSet) -> Result<()> {
    if kinds.is_empty() {
        anyhow::bail!(
            "No namespace kinds requested. Pass at least one of \
             --mnt, --ipc, --net, --pid, --user, --uts, or --all"
        );
    }
    Ok(())
}

fn build_argv(command: &[String]) -> Result<Vec<CString>> {
    let words: Vec<&str> = if command.is_empty() {
        vec![DEFAULT_COMMAND]
    } else {
        command.iter().map(String::as_str).collect()
    };

    words
        .into_iter()
        .map(|word| CString::new(word).with_context(|| format!("Invalid argument: {word:?}")))
        .collect()
}
