use crate::engine::pipeline::{FieldValue, Row, RowBatch};

pub struct RowBatchFactory {
    rows: Vec<Row>,
}

impl RowBatchFactory {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// One single-field text row per value.
    pub fn with_texts(mut self, values: &[&str]) -> Self {
        self.rows
            .extend(values.iter().map(|v| Row::new(vec![FieldValue::from(*v)])));
        self
    }

    pub fn with_row(mut self, values: Vec<FieldValue>) -> Self {
        self.rows.push(Row::new(values));
        self
    }

    /// `count` rows of `[Long(start + i)]`.
    pub fn with_numbered_rows(mut self, start: i64, count: usize) -> Self {
        self.rows.extend(
            (0..count as i64).map(|i| Row::new(vec![FieldValue::Long(start + i)])),
        );
        self
    }

    pub fn create(self) -> RowBatch {
        self.rows.into_iter().collect()
    }
}
