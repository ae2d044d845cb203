//! Saved preset selection with file locking.
//!
//! The CLI keeps the user's current selection between invocations. Reads
//! take a shared lock; writes go to a locked temp file that is renamed over
//! the original.

use crate::{resolve, Error, Resolution, Result, RuleSet, RuleVariant, Selection};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// The user's last resolved selection
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SavedSelection {
    #[serde(default)]
    pub presets: Selection,
    /// Rule revision the selection was resolved under
    #[serde(default)]
    pub variant: RuleVariant,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SavedSelection {
    /// Record a fresh resolution
    pub fn from_resolution(resolution: &Resolution, variant: RuleVariant) -> Self {
        Self {
            presets: resolution.resolved.clone(),
            variant,
            saved_at: Some(Utc::now()),
        }
    }

    /// Re-resolve the stored tags under `rules`
    ///
    /// A selection saved by an older build, or under another rule variant,
    /// may no longer be consistent; this brings it back in line.
    pub fn restore(&self, rules: &RuleSet) -> Resolution {
        let resolution = resolve(&self.presets, rules);
        if !resolution.adjustments.is_empty() {
            tracing::warn!(
                "Saved selection was inconsistent under {} rules; unselected {:?}, added {:?}",
                rules.variant(),
                resolution.adjustments.auto_unselected,
                resolution.adjustments.auto_added
            );
        }
        resolution
    }

    /// Load the saved selection with shared locking
    ///
    /// Returns the default (empty) selection if the file doesn't exist or
    /// can't be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No saved selection at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open selection file {:?}: {}. Starting empty.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock selection file {:?}: {}. Starting empty.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read selection file {:?}: {}. Starting empty.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<SavedSelection>(&contents) {
            Ok(saved) => {
                tracing::debug!("Loaded {} saved presets from {:?}", saved.presets.len(), path);
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!("Failed to parse selection file {:?}: {}. Starting empty.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save atomically with exclusive locking
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("selection path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved selection to {:?}", path);
        Ok(())
    }

    /// Load, modify and save back in one step
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut SavedSelection) -> Result<()>,
    {
        let mut saved = Self::load(path)?;
        f(&mut saved)?;
        saved.save(path)?;
        Ok(saved)
    }

    /// Remove the saved selection, if any
    pub fn clear(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tag;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("selection.json");

        let resolution = resolve(&Selection::from_strs(["keto", "halal"]), &RuleSet::current());
        let saved = SavedSelection::from_resolution(&resolution, RuleVariant::Current);
        saved.save(&path).unwrap();

        let loaded = SavedSelection::load(&path).unwrap();
        assert_eq!(loaded, saved);
        assert!(loaded.presets.contains(&Tag::Halal));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let loaded = SavedSelection::load(&temp_dir.path().join("missing.json")).unwrap();
        assert!(loaded.presets.is_empty());
        assert!(loaded.saved_at.is_none());
    }

    #[test]
    fn test_corrupted_file_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("selection.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let loaded = SavedSelection::load(&path).unwrap();
        assert_eq!(loaded, SavedSelection::default());
    }

    #[test]
    fn test_restore_repairs_inconsistent_selection() {
        crate::logging::init_test();
        let saved = SavedSelection {
            presets: Selection::from_strs(["vegetarian", "vegan", "keto", "low-carb"]),
            variant: RuleVariant::Legacy,
            saved_at: None,
        };

        let resolution = saved.restore(&RuleSet::current());
        assert!(!resolution.resolved.contains(&Tag::Vegetarian));
        assert!(!resolution.resolved.contains(&Tag::LowCarb));
        assert!(resolution.resolved.contains(&Tag::EggFree));
    }

    #[test]
    fn test_update_pattern() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("selection.json");

        SavedSelection::update(&path, |saved| {
            saved.presets.insert(Tag::Paleo);
            Ok(())
        })
        .unwrap();

        let loaded = SavedSelection::load(&path).unwrap();
        assert!(loaded.presets.contains(&Tag::Paleo));
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("selection.json");
        SavedSelection::default().save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "selection.json")
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("selection.json");
        SavedSelection::default().save(&path).unwrap();

        SavedSelection::clear(&path).unwrap();
        assert!(!path.exists());
        SavedSelection::clear(&path).unwrap();
    }
}
