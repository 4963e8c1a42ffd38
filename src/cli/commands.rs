//! Subcommand implementations

use super::{GlobalArgs, prepare, setup};
use crate::btsets::{BtSettings, SettingsStore, locate_cache_dir};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Print the active settings after a startup load
pub async fn run_show(args: &GlobalArgs) -> Result<()> {
    let (_, store) = prepare(args)?;
    store.load().await;
    print_settings(&store)
}

/// Apply a candidate record read from `input` (`-` for stdin)
pub async fn run_set(args: &GlobalArgs, input: &Path) -> Result<()> {
    let candidate = read_candidate(input)?;
    let (_, store) = prepare(args)?;
    store.load().await;

    let outcome = store.set(candidate).await;
    if !outcome.applied {
        tracing::warn!("Settings are read-only, nothing was changed");
    } else if !outcome.persisted {
        tracing::warn!("Settings applied but not saved");
    }

    // The process is about to exit, so let the scan finish first
    if let Some(locator) = outcome.locator {
        locator.finished().await;
    }

    print_settings(&store)
}

/// Publish and print the built-in defaults
pub async fn run_reset(args: &GlobalArgs) -> Result<()> {
    let (_, store) = prepare(args)?;
    store.set_default();
    print_settings(&store)
}

/// Scan `dir` for a cache marker and print where it is
pub async fn run_locate(args: &GlobalArgs, dir: &Path) -> Result<()> {
    setup(args)?;
    let found: Option<PathBuf> = locate_cache_dir(dir)
        .await
        .with_context(|| format!("scanning {}", dir.display()))?;

    match found {
        Some(path) => println!("{}", path.display()),
        None => anyhow::bail!("No cache marker found below {}", dir.display()),
    }
    Ok(())
}

fn read_candidate(input: &Path) -> Result<BtSettings> {
    let content = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading settings from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("reading settings from {}", input.display()))?
    };

    serde_json::from_str(&content).context("parsing settings JSON")
}

fn print_settings(store: &SettingsStore) -> Result<()> {
    let json = serde_json::to_string_pretty(&*store.current())?;
    println!("{}", json);
    Ok(())
}
