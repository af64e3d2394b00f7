//! Chrome profile directories for scrape sessions
//!
//! Every session gets its own UUID-named profile so concurrent sessions never
//! fight over a `SingletonLock`. Profiles left behind by a crash are swept at
//! startup by `cleanup_stale_profiles`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::utils::constants::PROFILE_DIR_PREFIX;

/// Profiles older than this are assumed orphaned
pub const STALE_PROFILE_AGE: Duration = Duration::from_secs(6 * 60 * 60);

/// RAII wrapper for a Chrome profile directory
///
/// Removes the directory on drop unless ownership was handed off with
/// `into_path()`.
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl BrowserProfile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            cleanup_on_drop: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consume the profile and return the path, disabling auto-cleanup
    pub fn into_path(mut self) -> PathBuf {
        self.cleanup_on_drop = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.cleanup_on_drop && self.path.exists() {
            debug!("BrowserProfile cleanup: removing {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!("Failed to cleanup profile directory {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Create a unique profile directory under `root`
///
/// `create_dir` (not `create_dir_all`) makes a UUID collision an error
/// instead of a shared profile.
pub fn create_unique_profile_in(root: &Path, prefix: &str) -> Result<BrowserProfile> {
    let path = root.join(format!("{}_{}", prefix, Uuid::new_v4()));

    std::fs::create_dir(&path)
        .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

    debug!("Created Chrome profile directory: {}", path.display());
    Ok(BrowserProfile::new(path))
}

/// Create a unique session profile in the system temp directory
pub fn create_unique_profile() -> Result<BrowserProfile> {
    create_unique_profile_in(&std::env::temp_dir(), PROFILE_DIR_PREFIX)
}

/// Remove orphaned session profiles from the system temp directory
///
/// Called once at startup. Returns how many directories were removed.
pub fn cleanup_stale_profiles() -> Result<usize> {
    cleanup_stale_profiles_in(&std::env::temp_dir(), PROFILE_DIR_PREFIX, STALE_PROFILE_AGE)
}

/// Remove `prefix_*` directories under `root` not modified within `max_age`
pub fn cleanup_stale_profiles_in(root: &Path, prefix: &str, max_age: Duration) -> Result<usize> {
    let entries = std::fs::read_dir(root)
        .with_context(|| format!("Failed to read directory: {}", root.display()))?;

    let now = SystemTime::now();
    let marker = format!("{prefix}_");
    let mut cleaned = 0;

    for entry in entries.flatten() {
        let path = entry.path();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with(&marker) || !path.is_dir() {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();

        if age < max_age {
            continue;
        }

        info!("Cleaning stale profile: {}", path.display());
        if let Err(e) = std::fs::remove_dir_all(&path) {
            warn!("Failed to remove stale profile {}: {}", path.display(), e);
        } else {
            cleaned += 1;
        }
    }

    if cleaned > 0 {
        info!("Cleaned {} stale Chrome profile directories", cleaned);
    }

    Ok(cleaned)
}
