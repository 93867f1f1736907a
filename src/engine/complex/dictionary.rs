use crate::engine::complex::GenericType;
use crate::engine::errors::CodecError;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Key reserved for the null member of every column.
pub const NULL_SURROGATE_KEY: u32 = 1;

/// Resolves leaf values to surrogate keys.
///
/// Implementations must hand out the same key for the same value of the
/// same column for the whole load job.
pub trait SurrogateKeyGenerator: Send + Sync {
    fn generate_surrogate_key(&self, value: &str, column: &GenericType) -> Result<u32, CodecError>;

    /// Highest key handed out so far for `column_id`, [`NULL_SURROGATE_KEY`] if none.
    fn max_surrogate_key(&self, column_id: &str) -> u32;
}

#[derive(Debug)]
struct ColumnDictionary {
    keys: HashMap<String, u32>,
    next_key: u32,
}

impl ColumnDictionary {
    fn new() -> Self {
        Self {
            keys: HashMap::new(),
            next_key: NULL_SURROGATE_KEY + 1,
        }
    }

    fn max_key(&self) -> u32 {
        self.next_key - 1
    }
}

/// Process-local dictionary shared by every partition of a load.
#[derive(Debug, Default)]
pub struct InMemoryDictionary {
    columns: Mutex<HashMap<String, ColumnDictionary>>,
}

impl InMemoryDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct non-null values seen for `column_id`.
    pub fn distinct_values(&self, column_id: &str) -> usize {
        self.columns
            .lock()
            .get(column_id)
            .map(|c| c.keys.len())
            .unwrap_or(0)
    }

    #[cfg(test)]
    pub fn lookup(&self, column_id: &str, value: &str) -> Option<u32> {
        self.columns
            .lock()
            .get(column_id)
            .and_then(|c| c.keys.get(value).copied())
    }
}

impl SurrogateKeyGenerator for InMemoryDictionary {
    fn generate_surrogate_key(&self, value: &str, column: &GenericType) -> Result<u32, CodecError> {
        let mut columns = self.columns.lock();
        let dict = columns
            .entry(column.column_id().to_string())
            .or_insert_with(ColumnDictionary::new);

        if let Some(key) = dict.keys.get(value) {
            return Ok(*key);
        }

        let key = dict.next_key;
        dict.next_key = key.checked_add(1).ok_or_else(|| CodecError::Parsing {
            column: column.name().to_string(),
            message: "dictionary key space exhausted".to_string(),
        })?;
        dict.keys.insert(value.to_string(), key);

        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(
                target: "ingest::dictionary",
                column = column.name(),
                key,
                "Assigned new surrogate key"
            );
        }
        if key % 100_000 == 0 {
            debug!(
                target: "ingest::dictionary",
                column = column.name(),
                key,
                "Dictionary growing"
            );
        }
        Ok(key)
    }

    fn max_surrogate_key(&self, column_id: &str) -> u32 {
        self.columns
            .lock()
            .get(column_id)
            .map(ColumnDictionary::max_key)
            .unwrap_or(NULL_SURROGATE_KEY)
    }
}
