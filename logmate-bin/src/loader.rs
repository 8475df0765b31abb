use anyhow::{Context, Result};
use logmate_engine::LoadedLog;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
    thread,
};

/// read a file and build its [`LoadedLog`]
///
/// non-UTF-8 content is rejected here so the engine only ever sees valid text.
pub fn load_file(path: &Path) -> Result<LoadedLog> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8 text", path.display()))?;

    Ok(LoadedLog::from_content(&content))
}

/// load `path` on a worker thread; the result arrives on the returned channel
///
/// the UI thread polls the receiver between frames. dropping the receiver
/// abandons the load: the worker finishes and its result is discarded.
pub fn spawn_load_thread(path: PathBuf) -> Receiver<Result<LoadedLog>> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        log::info!("Loading {}", path.display());

        let result = load_file(&path);
        match &result {
            Ok(loaded) => log::info!(
                "Loaded {} ({} lines)",
                path.display(),
                loaded.summary.total_lines
            ),
            Err(e) => log::error!("Failed to load {}: {:#}", path.display(), e),
        }

        if sender.send(result).is_err() {
            log::debug!("Load of {} superseded, result dropped", path.display());
        }
    });

    receiver
}
