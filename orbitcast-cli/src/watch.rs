//! Live forecast loop: re-run the forecast whenever the scenario file changes

use crate::{forecast_file, ForecastOptions};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;

pub fn watch_file(file: &Path, options: &ForecastOptions) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        // The receiver only goes away on shutdown
        let _ = tx.send(res);
    })
    .context("cannot create file watcher")?;
    watcher
        .watch(file, RecursiveMode::NonRecursive)
        .with_context(|| format!("cannot watch {}", file.display()))?;

    tracing::info!(file = %file.display(), "watching scenario");
    report(file, options);

    for event in rx.iter() {
        match event {
            Ok(Event {
                kind: EventKind::Modify(_),
                ..
            }) => {
                // drain the burst of events a single save produces
                while rx.try_recv().is_ok() {}
                report(file, options);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("file watcher error: {}", e),
        }
    }
    Ok(())
}

fn report(file: &Path, options: &ForecastOptions) {
    println!("--- {}", file.display());
    if let Err(e) = forecast_file(file, options) {
        // A broken edit should not end the session
        eprintln!("Error: {:#}", e);
    }
}
