use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

/// Persisted best score. Reads never fail: anything unreadable counts as 0.
pub trait HighScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, value: u32) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    value: u32,
    saves: u32,
}

impl MemoryStore {
    pub fn with_value(value: u32) -> Self {
        Self { value, saves: 0 }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.value
    }

    fn save(&mut self, value: u32) -> Result<(), StoreError> {
        self.value = value;
        self.saves += 1;
        Ok(())
    }
}
