//! JSON checkpoints of a control model and its time manager.
//!
//! Layout: one directory, one pretty-printed `checkpoint_NNNNNN.json` file
//! per checkpoint. Indices grow monotonically, so lexical and numeric order
//! agree and a new manager on an existing directory keeps counting.

use std::fs;
use std::path::{Path, PathBuf};

use cdl_core::{CdlError, TimeManager, TimeState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::model::{BlockSnapshot, ControlModel};

const PREFIX: &str = "checkpoint_";
const EXTENSION: &str = "json";

/// On-disk checkpoint record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub created_at: DateTime<Utc>,
    pub time: TimeState,
    pub blocks: BlockSnapshot,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

fn checkpoint_index(path: &Path) -> Option<u64> {
    if path.extension()? != EXTENSION {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(PREFIX)?
        .parse()
        .ok()
}

#[derive(Debug, Clone)]
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> SimResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the model and time state to a new checkpoint file.
    pub fn save_checkpoint<M: ControlModel>(
        &self,
        model: &M,
        time: &TimeManager,
        metadata: serde_json::Value,
    ) -> SimResult<PathBuf> {
        let checkpoint = Checkpoint {
            created_at: Utc::now(),
            time: time.get_state(),
            blocks: model.snapshot()?,
            metadata,
        };

        let next = self
            .list_checkpoints()?
            .last()
            .and_then(|p| checkpoint_index(p))
            .map_or(0, |i| i + 1);
        let path = self.dir.join(format!("{PREFIX}{next:06}.{EXTENSION}"));

        fs::write(&path, serde_json::to_string_pretty(&checkpoint)?)?;
        tracing::info!(
            path = %path.display(),
            t = checkpoint.time.current_time,
            blocks = checkpoint.blocks.len(),
            "checkpoint saved"
        );
        Ok(path)
    }

    pub fn load_checkpoint(&self, path: &Path) -> SimResult<Checkpoint> {
        if !path.exists() {
            return Err(SimError::CheckpointNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Restore the model and time manager from `path`; returns the stored
    /// metadata.
    ///
    /// If the model rejects the snapshot, its blocks are rolled back to the
    /// states they had before the call and the time manager is untouched.
    pub fn restore_checkpoint<M: ControlModel>(
        &self,
        model: &mut M,
        time: &TimeManager,
        path: &Path,
    ) -> SimResult<serde_json::Value> {
        let checkpoint = self.load_checkpoint(path)?;
        let previous = model.snapshot()?;
        if let Err(err) = model.restore(&checkpoint.blocks) {
            model.restore(&previous)?;
            return Err(err);
        }
        time.set_state(checkpoint.time);
        tracing::info!(
            path = %path.display(),
            t = checkpoint.time.current_time,
            "checkpoint restored"
        );
        Ok(checkpoint.metadata)
    }

    /// Checkpoint files in this directory, oldest first.
    pub fn list_checkpoints(&self) -> SimResult<Vec<PathBuf>> {
        let mut found: Vec<(u64, PathBuf)> = Vec::new();
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file()
                && let Some(index) = checkpoint_index(&path)
            {
                found.push((index, path));
            }
        }
        found.sort_by_key(|(index, _)| *index);
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }

    pub fn latest_checkpoint(&self) -> SimResult<Option<PathBuf>> {
        Ok(self.list_checkpoints()?.pop())
    }

    /// Delete all but the newest `keep` checkpoints; returns how many were removed.
    pub fn prune(&self, keep: usize) -> SimResult<usize> {
        let all = self.list_checkpoints()?;
        let excess = all.len().saturating_sub(keep);
        for path in &all[..excess] {
            fs::remove_file(path)?;
            tracing::debug!(path = %path.display(), "checkpoint pruned");
        }
        Ok(excess)
    }
}

/// Saves a checkpoint every `interval_steps` steps.
#[derive(Debug, Clone)]
pub struct AutoCheckpointer {
    manager: CheckpointManager,
    interval_steps: usize,
    keep_last: Option<usize>,
}

impl AutoCheckpointer {
    pub fn new(manager: CheckpointManager, interval_steps: usize) -> SimResult<Self> {
        if interval_steps == 0 {
            return Err(CdlError::config("AutoCheckpointer", "interval_steps must be > 0").into());
        }
        Ok(Self {
            manager,
            interval_steps,
            keep_last: None,
        })
    }

    /// Keep only the newest `keep_last` checkpoints after each save.
    pub fn with_keep_last(mut self, keep_last: usize) -> SimResult<Self> {
        if keep_last == 0 {
            return Err(CdlError::config("AutoCheckpointer", "keep_last must be > 0").into());
        }
        self.keep_last = Some(keep_last);
        Ok(self)
    }

    pub fn manager(&self) -> &CheckpointManager {
        &self.manager
    }

    pub fn interval_steps(&self) -> usize {
        self.interval_steps
    }

    /// Save when `step` (0-based) closes an interval.
    pub fn maybe_checkpoint<M: ControlModel>(
        &self,
        model: &M,
        time: &TimeManager,
        step: usize,
        metadata: serde_json::Value,
    ) -> SimResult<Option<PathBuf>> {
        if (step + 1) % self.interval_steps != 0 {
            return Ok(None);
        }
        let path = self.manager.save_checkpoint(model, time, metadata)?;
        if let Some(keep) = self.keep_last {
            self.manager.prune(keep)?;
        }
        Ok(Some(path))
    }
}
