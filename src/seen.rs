// src/seen.rs
//! Applicant IDs that have already been announced. The only durable state.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fsio::write_atomic;

/// Insertion-ordered set of applicant IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    order: Vec<i64>,
    index: HashSet<i64>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains(&id)
    }

    /// Returns how many IDs were not already present.
    pub fn extend<I: IntoIterator<Item = i64>>(&mut self, ids: I) -> usize {
        let mut added = 0;
        for id in ids {
            if self.index.insert(id) {
                self.order.push(id);
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.order.iter().copied()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.order).context("serializing seen set")
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let ids: Vec<i64> = serde_json::from_str(s).context("seen set must be a JSON array of integers")?;
        let mut set = Self::new();
        set.extend(ids);
        Ok(set)
    }
}

impl FromIterator<i64> for SeenSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// File-backed [`SeenSet`]. Writes replace the whole file.
#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    set: SeenSet,
    dirty: bool,
}

impl SeenStore {
    /// The file must exist and hold a JSON integer array (`[]` to start).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw = fs::read_to_string(&path).with_context(|| {
            format!(
                "reading seen applicants from {} (create it with `[]` on first use)",
                path.display()
            )
        })?;
        let set = SeenSet::from_json(&raw)
            .with_context(|| format!("parsing seen applicants in {}", path.display()))?;
        Ok(Self {
            path,
            set,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set(&self) -> &SeenSet {
        &self.set
    }

    /// Add announced IDs in memory; call [`SeenStore::save`] to persist.
    pub fn record<I: IntoIterator<Item = i64>>(&mut self, ids: I) -> usize {
        let added = self.set.extend(ids);
        if added > 0 {
            self.dirty = true;
        }
        added
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&mut self) -> Result<()> {
        let json = self.set.to_json()?;
        write_atomic(&self.path, json.as_bytes())?;
        self.dirty = false;
        Ok(())
    }

    /// Save only if something was recorded since the last save.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_counts_only_new_ids() {
        let mut s: SeenSet = [1000, 1001].into_iter().collect();
        assert_eq!(s.extend([1001, 1002, 1002]), 1);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![1000, 1001, 1002]);
        assert!(s.contains(1002));
        assert!(!s.contains(7));
    }

    #[test]
    fn json_shape_is_a_plain_array() {
        let s = SeenSet::from_json("[3, 1, 2]").unwrap();
        assert_eq!(s.to_json().unwrap(), "[3,1,2]");
        assert!(SeenSet::from_json(r#"{"ids":[1]}"#).is_err());
        assert!(SeenSet::from_json(r#"["1"]"#).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SeenStore::open(dir.path().join("interns.json")).unwrap_err();
        assert!(format!("{err:#}").contains("interns.json"));
    }

    #[test]
    fn flush_writes_only_when_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("interns.json");
        fs::write(&p, "[ 1000 ]").unwrap();

        let mut store = SeenStore::open(&p).unwrap();
        store.flush().unwrap();
        // untouched: hand-written formatting survives
        assert_eq!(fs::read_to_string(&p).unwrap(), "[ 1000 ]");

        assert_eq!(store.record([1000]), 0);
        assert!(!store.is_dirty());
        assert_eq!(store.record([1001]), 1);
        store.flush().unwrap();
        assert_eq!(fs::read_to_string(&p).unwrap(), "[1000,1001]");
        assert!(!store.is_dirty());
    }
}
