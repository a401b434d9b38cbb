//! JSON file storage implementation.
//!
//! Stores one JSON document per entity under a root directory and keeps small
//! per-collection meta markers (version + updated_at). Completion records are
//! keyed by unit kind and id, so the latest write for a unit replaces the
//! previous one.

use std::path::{Path, PathBuf};
use curriculum_core::{CompletionRecord, LearnerId, Lesson, Mission, TrackId, UnitId};
use super::{Storage, StorageError, Result};
use tokio::fs;
use tracing::{debug, warn};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the directory layout under `root` if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("missions")).await?;
        fs::create_dir_all(root.join("lessons")).await?;
        fs::create_dir_all(root.join("completions")).await?;
        fs::create_dir_all(root.join("meta").join("completions")).await?;

        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn mission_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.root.join("missions").join(format!("{}.json", file_stem(id)?)))
    }

    fn lesson_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.root.join("lessons").join(format!("{}.json", file_stem(id)?)))
    }

    fn learner_dir(&self, learner: &LearnerId) -> Result<PathBuf> {
        Ok(self.root.join("completions").join(file_stem(learner.as_str())?))
    }

    fn completion_path(&self, record: &CompletionRecord) -> Result<PathBuf> {
        Ok(self.learner_dir(&record.learner_id)?.join(format!(
            "{}-{}.json",
            record.kind.as_str(),
            file_stem(record.unit_id.as_str())?
        )))
    }

    fn catalog_meta_path(&self) -> PathBuf {
        self.root.join("meta").join("catalog.meta.json")
    }

    fn completions_meta_path(&self, learner: &LearnerId) -> Result<PathBuf> {
        Ok(self
            .root
            .join("meta")
            .join("completions")
            .join(format!("{}.meta.json", file_stem(learner.as_str())?)))
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_mission(&mut self, mission: &Mission) -> Result<()> {
        let path = self.mission_path(mission.id.as_str())?;
        write_json(&path, mission).await?;
        let version = bump_version(&self.catalog_meta_path()).await?;
        debug!("Saved mission {} (catalog v{})", mission.id, version);
        Ok(())
    }

    async fn load_mission(&self, id: &UnitId) -> Result<Option<Mission>> {
        read_json(&self.mission_path(id.as_str())?).await
    }

    async fn list_missions(&self, track: &TrackId) -> Result<Vec<Mission>> {
        let all: Vec<Mission> = list_dir(&self.root.join("missions")).await?;
        Ok(all.into_iter().filter(|m| &m.track == track).collect())
    }

    async fn save_lesson(&mut self, lesson: &Lesson) -> Result<()> {
        let path = self.lesson_path(lesson.id.as_str())?;
        write_json(&path, lesson).await?;
        let version = bump_version(&self.catalog_meta_path()).await?;
        debug!("Saved lesson {} (catalog v{})", lesson.id, version);
        Ok(())
    }

    async fn load_lesson(&self, id: &UnitId) -> Result<Option<Lesson>> {
        read_json(&self.lesson_path(id.as_str())?).await
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>> {
        list_dir(&self.root.join("lessons")).await
    }

    async fn catalog_version(&self) -> Result<u64> {
        read_version(&self.catalog_meta_path()).await
    }

    async fn save_completion(&mut self, record: &CompletionRecord) -> Result<()> {
        fs::create_dir_all(self.learner_dir(&record.learner_id)?).await?;
        write_json(&self.completion_path(record)?, record).await?;

        let version = bump_version(&self.completions_meta_path(&record.learner_id)?).await?;
        debug!(
            "Saved {} record for {} on {} (completions v{})",
            record.status.as_str(),
            record.learner_id,
            record.unit_id,
            version
        );
        Ok(())
    }

    async fn list_completions(&self, learner: &LearnerId) -> Result<Vec<CompletionRecord>> {
        let dir = self.learner_dir(learner)?;
        if fs::metadata(&dir).await.is_err() {
            return Ok(Vec::new());
        }
        let mut records: Vec<CompletionRecord> = list_dir(&dir).await?;
        records.sort_by(|a, b| a.updated_at.cmp(&b.updated_at));
        Ok(records)
    }

    async fn completions_version(&self, learner: &LearnerId) -> Result<u64> {
        read_version(&self.completions_meta_path(learner)?).await
    }
}

/// Validate an external id for use as a file name.
fn file_stem(id: &str) -> Result<&str> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0']);
    if valid {
        Ok(id)
    } else {
        Err(StorageError::Other(format!("id {:?} cannot be stored as a file name", id)))
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json.as_bytes()).await?;
    Ok(())
}

async fn read_version(path: &Path) -> Result<u64> {
    match fs::read_to_string(path).await {
        Ok(s) => {
            let json: serde_json::Value = serde_json::from_str(&s)?;
            Ok(json.get("version").and_then(|v| v.as_u64()).unwrap_or(0))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Read and increment a collection version, return the new version.
async fn bump_version(path: &Path) -> Result<u64> {
    let version = read_version(path).await? + 1;
    let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
    fs::write(path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
    Ok(version)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable document {}: {}", path.display(), e),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curriculum_core::{CompletionStatus, UnitKind};

    #[tokio::test]
    async fn test_missions_filtered_by_track() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        storage.save_mission(&Mission::new("m1", "builder", 1, 1)).await.unwrap();
        storage.save_mission(&Mission::new("m2", "explorer", 1, 1)).await.unwrap();

        let missions = storage.list_missions(&"builder".into()).await.unwrap();
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0].id.as_str(), "m1");
    }

    #[tokio::test]
    async fn test_catalog_version_bumps_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        assert_eq!(storage.catalog_version().await.unwrap(), 0);

        storage.save_mission(&Mission::new("m1", "builder", 1, 1)).await.unwrap();
        storage.save_lesson(&Lesson::new("l1", "mod-a", 1)).await.unwrap();
        assert_eq!(storage.catalog_version().await.unwrap(), 2);
        assert_eq!(storage.list_lessons().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_completion_overwrites_per_unit() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let learner = LearnerId::new("ana");

        storage
            .save_completion(&CompletionRecord::mission(learner.clone(), "m1".into(), CompletionStatus::InProgress))
            .await
            .unwrap();
        storage
            .save_completion(&CompletionRecord::mission(learner.clone(), "m1".into(), CompletionStatus::Completed))
            .await
            .unwrap();

        let records = storage.list_completions(&learner).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, CompletionStatus::Completed);
        assert_eq!(storage.completions_version(&learner).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_mission_and_lesson_completions_stored_apart() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let learner = LearnerId::new("ana");

        storage
            .save_completion(&CompletionRecord::mission(learner.clone(), "x".into(), CompletionStatus::Completed))
            .await
            .unwrap();
        storage
            .save_completion(&CompletionRecord::lesson(learner.clone(), "x".into(), None))
            .await
            .unwrap();

        let records = storage.list_completions(&learner).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.kind == UnitKind::Mission && r.status == CompletionStatus::Completed));
        assert!(records.iter().any(|r| r.kind == UnitKind::Lesson && r.status == CompletionStatus::NotStarted));
    }

    #[tokio::test]
    async fn test_load_catalog_units_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.save_mission(&Mission::new("m1", "builder", 1, 1)).await.unwrap();
        storage.save_lesson(&Lesson::new("l1", "mod-a", 1)).await.unwrap();

        assert!(storage.load_mission(&"m1".into()).await.unwrap().is_some());
        assert!(storage.load_mission(&"l1".into()).await.unwrap().is_none());
        assert_eq!(storage.load_lesson(&"l1".into()).await.unwrap().map(|l| l.order), Some(1));
        assert!(storage.load_lesson(&"missing".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_learner_has_no_completions() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let learner = LearnerId::new("nobody");

        assert!(storage.list_completions(&learner).await.unwrap().is_empty());
        assert_eq!(storage.completions_version(&learner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let result = storage.save_mission(&Mission::new("../escape", "builder", 1, 1)).await;
        assert!(matches!(result, Err(StorageError::Other(_))));
    }

    #[tokio::test]
    async fn test_corrupt_document_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        storage.save_lesson(&Lesson::new("l1", "mod-a", 1)).await.unwrap();
        fs::write(dir.path().join("lessons").join("broken.json"), b"{not json").await.unwrap();

        let lessons = storage.list_lessons().await.unwrap();
        assert_eq!(lessons.len(), 1);
    }
}
