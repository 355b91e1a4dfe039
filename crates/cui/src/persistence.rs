use rankguess_core::{HighScoreStore, StoreError, DEFAULT_HIGH_SCORE_KEY};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub fn default_score_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("RANKGUESS_SAVE") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".rankguess_scores.json"))
}

/// High score kept as one entry of a small JSON object; other entries in the file survive writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    key: String,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(path, DEFAULT_HIGH_SCORE_KEY)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Option<Map<String, Value>> {
        let body = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&body).ok()? {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl HighScoreStore for FileStore {
    fn load(&self) -> u32 {
        let Some(map) = self.read_map() else {
            return 0;
        };
        match map.get(&self.key) {
            Some(Value::Number(n)) => n.as_u64().map_or(0, |v| v.min(u64::from(u32::MAX)) as u32),
            // browsers stored the value as a string
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn save(&mut self, value: u32) -> Result<(), StoreError> {
        let mut map = self.read_map().unwrap_or_default();
        map.insert(self.key.clone(), Value::from(value));
        let body = serde_json::to_string_pretty(&Value::Object(map))
            .map_err(|err| StoreError::Serialize(err.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn missing_file_reads_zero() {
        let store = FileStore::at(unique_temp_file());
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn save_load_roundtrip_keeps_other_keys() {
        let file = unique_temp_file();
        std::fs::write(&file, r#"{"theme":"dark"}"#).expect("write");
        let mut store = FileStore::at(&file);
        store.save(17).expect("save");
        assert_eq!(store.load(), 17);
        let body = std::fs::read_to_string(&file).expect("read");
        let value: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["gdHighScore"], 17);
        let _ = std::fs::remove_file(file);
    }

    #[test]
    fn string_values_and_garbage_are_tolerated() {
        let file = unique_temp_file();
        std::fs::write(&file, r#"{"gdHighScore":"12"}"#).expect("write");
        assert_eq!(FileStore::at(&file).load(), 12);
        std::fs::write(&file, "not json").expect("write");
        assert_eq!(FileStore::at(&file).load(), 0);
        let mut store = FileStore::at(&file);
        store.save(3).expect("overwrite garbage");
        assert_eq!(store.load(), 3);
        let _ = std::fs::remove_file(file);
    }

    fn unique_temp_file() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "rankguess_cui_persistence_test_{}_{}.json",
            std::process::id(),
            nanos
        ))
    }
}
