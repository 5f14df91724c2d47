//! Atomic JSON persistence shared by the orchestrator, time-series store,
//! and trend engine: every artifact is written to a temp file in the same
//! directory and renamed into place, so a crash mid-write never leaves a
//! half-written `trends.json` or `keyword_history.json` behind. This
//! generalizes the ad hoc write-then-rename the teacher applies informally
//! in its persistence code into one shared primitive.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::types::{RawContent, RawSnapshotFile};
use crate::error::StoreError;

/// Write `value` to `path` atomically: serialize to a sibling `.tmp` file,
/// `fsync`-free rename into place (rename is atomic on the same filesystem).
pub fn write_json_atomic<T: Serialize>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StoreError::SaveFailed(format!("creating {}: {e}", parent.display())))?;
    }

    let serialized = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| StoreError::SaveFailed(e.to_string()))?;

    let tmp_path = tmp_path_for(path);
    std::fs::write(&tmp_path, serialized)
        .map_err(|e| StoreError::SaveFailed(format!("writing {}: {e}", tmp_path.display())))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| StoreError::SaveFailed(format!("renaming into {}: {e}", path.display())))?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let file_name = path
        .file_name()
        .map(|n| format!("{}.tmp", n.to_string_lossy()))
        .unwrap_or_else(|| "trend-scout.tmp".to_string());
    tmp.set_file_name(file_name);
    tmp
}

/// Write a raw crawl snapshot to `data/raw_feeds/raw_<YYYYmmdd_HHMMSS>.json`,
/// wrapped in the `{crawl_time, total, items}` envelope per spec §6 (not a
/// bare array).
pub fn save_raw_snapshot(
    data_dir: &Path,
    items: &[RawContent],
    now: DateTime<Utc>,
) -> Result<PathBuf, StoreError> {
    let raw_dir = data_dir.join("raw_feeds");
    let filename = format!("raw_{}.json", now.format("%Y%m%d_%H%M%S"));
    let path = raw_dir.join(filename);
    let file = RawSnapshotFile {
        crawl_time: now,
        total: items.len(),
        items: items.to_vec(),
    };
    write_json_atomic(&path, &file, false)?;
    Ok(path)
}

/// Delete raw snapshot files older than `retain_days`, keyed off the
/// timestamp embedded in the filename (not filesystem mtime, so the
/// retention policy survives a `cp -a`/backup round-trip).
pub fn prune_old_raw_snapshots(data_dir: &Path, retain_days: i64) -> Result<usize, StoreError> {
    let raw_dir = data_dir.join("raw_feeds");
    if !raw_dir.exists() {
        return Ok(0);
    }
    let cutoff = Utc::now() - chrono::Duration::days(retain_days);
    let mut pruned = 0;

    let entries = std::fs::read_dir(&raw_dir)
        .map_err(|e| StoreError::SaveFailed(format!("reading {}: {e}", raw_dir.display())))?;

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(ts_str) = stem.strip_prefix("raw_") else {
            continue;
        };
        let Ok(parsed) = chrono::NaiveDateTime::parse_from_str(ts_str, "%Y%m%d_%H%M%S") else {
            continue;
        };
        let stamped = DateTime::<Utc>::from_naive_utc_and_offset(parsed, Utc);
        if stamped < cutoff {
            if std::fs::remove_file(&path).is_ok() {
                pruned += 1;
            }
        }
    }

    Ok(pruned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ContentType;

    fn sample_item() -> RawContent {
        let now = Utc::now();
        RawContent {
            platform: crate::core::types::Platform::Weibo,
            content_id: "1".into(),
            title: "样例".into(),
            text: String::new(),
            author: String::new(),
            likes: 0,
            comments: 0,
            shares: 0,
            views: 0,
            tags: Vec::new(),
            url: String::new(),
            pub_time: now,
            crawl_time: now,
            content_type: ContentType::Status,
            extra: Default::default(),
        }
    }

    #[test]
    fn atomic_write_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let items = vec![sample_item()];
        write_json_atomic(&path, &items, true).unwrap();
        let back: Vec<RawContent> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn raw_snapshot_is_wrapped_in_crawl_time_total_items_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let items = vec![sample_item()];
        let path = save_raw_snapshot(dir.path(), &items, Utc::now()).unwrap();
        let back: RawSnapshotFile = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.total, 1);
        assert_eq!(back.items.len(), 1);
    }

    #[test]
    fn prune_removes_only_files_older_than_retention() {
        let dir = tempfile::tempdir().unwrap();
        let raw_dir = dir.path().join("raw_feeds");
        std::fs::create_dir_all(&raw_dir).unwrap();

        let old_name = raw_dir.join("raw_20000101_000000.json");
        std::fs::write(&old_name, "[]").unwrap();
        let recent = save_raw_snapshot(dir.path(), &[], Utc::now()).unwrap();

        let pruned = prune_old_raw_snapshots(dir.path(), 7).unwrap();
        assert_eq!(pruned, 1);
        assert!(!old_name.exists());
        assert!(recent.exists());
    }
}
