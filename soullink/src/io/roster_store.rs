//! Roster persistence: whole-file JSON with atomic replacement.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::roster::Roster;

/// Load/save contract for the roster aggregate.
pub trait RosterStore {
    /// Load the persisted roster. Missing or unreadable state yields a fresh
    /// empty roster.
    fn load(&self) -> Roster;

    /// Persist the whole roster. Readers never observe a half-written file.
    fn save(&self, roster: &Roster) -> Result<()>;
}

/// Retry policy for replacing the state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRetry {
    /// Rename attempts before falling back to a direct write.
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for SaveRetry {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_millis(50),
        }
    }
}

/// Roster stored as pretty-printed JSON at `path`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    retry: SaveRetry,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, retry: SaveRetry) -> Self {
        Self {
            path: path.into(),
            retry,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Roster>> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("read roster {}", self.path.display()))?;
        let roster = serde_json::from_str(&contents)
            .with_context(|| format!("parse roster {}", self.path.display()))?;
        Ok(Some(roster))
    }
}

impl RosterStore for JsonFileStore {
    fn load(&self) -> Roster {
        debug!(path = %self.path.display(), "loading roster");
        match self.read() {
            Ok(Some(roster)) => roster,
            Ok(None) => {
                debug!(path = %self.path.display(), "no roster yet; starting empty");
                Roster::default()
            }
            Err(err) => {
                warn!(error = %format!("{:#}", err), "unreadable roster; starting empty");
                Roster::default()
            }
        }
    }

    fn save(&self, roster: &Roster) -> Result<()> {
        debug!(
            path = %self.path.display(),
            pairings = roster.pairings.len(),
            fusions = roster.fusions.len(),
            "writing roster"
        );
        let mut buf = serde_json::to_string_pretty(roster).context("serialize roster")?;
        buf.push('\n');
        write_atomic(&self.path, &buf, self.retry, &StdFs)
    }
}

/// Filesystem steps behind [`write_atomic`].
trait WriteOps {
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

struct StdFs;

impl WriteOps for StdFs {
    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// Write via temp file + rename. Transient failures of either step are
/// retried; once attempts run out the target is written directly.
fn write_atomic(path: &Path, contents: &str, retry: SaveRetry, ops: &impl WriteOps) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("roster path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("json.tmp");

    let mut attempt = 1;
    loop {
        let replaced = ops
            .write(&tmp_path, contents)
            .and_then(|()| ops.rename(&tmp_path, path));
        match replaced {
            Ok(()) => return Ok(()),
            Err(err) if is_transient(&err) && attempt < retry.attempts.max(1) => {
                debug!(attempt, error = %err, "roster replace failed; retrying");
                attempt += 1;
                thread::sleep(retry.delay);
            }
            Err(err) if is_transient(&err) => {
                warn!(error = %err, "roster replace kept failing; writing in place");
                // Best effort; a leftover temp file is harmless.
                let _ = fs::remove_file(&tmp_path);
                return ops
                    .write(path, contents)
                    .with_context(|| format!("write roster {}", path.display()));
            }
            Err(err) => {
                let _ = fs::remove_file(&tmp_path);
                return Err(err).with_context(|| format!("replace roster {}", path.display()));
            }
        }
    }
}

/// Lock-style failures that typically clear once another handle closes.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::PermissionDenied | ErrorKind::ResourceBusy | ErrorKind::Interrupted
    )
}
