// src/lock.rs
//! Guard against overlapping runs: two runs at once would both announce the
//! same hires, since each only sees the other's IDs after it saves.

use anyhow::{anyhow, Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive advisory lock on `path`, held for as long as the value lives.
///
/// The OS drops the lock when the process exits, however it exits, so a
/// killed run never blocks the next one. The file itself stays on disk and
/// holds the PID of the last run that took it.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    _file: File,
}

impl RunLock {
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        // No truncate: a losing run must not wipe the holder's PID.
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("opening lock file {}", path.display()))?;

        if let Err(e) = FileExt::try_lock_exclusive(&file) {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                let mut owner = String::new();
                let _ = file.read_to_string(&mut owner);
                return Err(anyhow!(
                    "another run holds {} (pid {})",
                    path.display(),
                    owner.trim()
                ));
            }
            return Err(e).with_context(|| format!("locking {}", path.display()));
        }

        file.set_len(0)
            .with_context(|| format!("clearing lock file {}", path.display()))?;
        writeln!(file, "{}", std::process::id())
            .with_context(|| format!("writing lock file {}", path.display()))?;
        debug!(path = %path.display(), "run lock taken");
        Ok(Self { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID recorded by the current holder.
    pub fn owner(&self) -> Result<u32> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading lock file {}", self.path.display()))?;
        raw.trim()
            .parse()
            .with_context(|| format!("lock file {} holds {raw:?}", self.path.display()))
    }
}
