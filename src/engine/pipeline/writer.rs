use crate::engine::complex::{ColumnarBlocks, ColumnarTransposer};
use crate::engine::errors::StageExecutionError;
use crate::engine::pipeline::{DataField, DataType, FieldValue, RowBatch};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Terminal consumer of a load. Opened once per partition.
pub trait BatchWriter: Send + Sync {
    fn open_partition(
        &self,
        partition: usize,
        fields: &[DataField],
    ) -> Result<Box<dyn PartitionWriter>, StageExecutionError>;
}

pub trait PartitionWriter: Send {
    fn write_batch(&mut self, batch: &RowBatch) -> Result<(), StageExecutionError>;

    fn close(self: Box<Self>) -> Result<(), StageExecutionError>;
}

/// Column data collected for one partition.
#[derive(Debug, Clone, Default)]
pub struct PartitionOutput {
    pub partition: usize,
    pub rows: usize,
    /// Transposed output columns per complex field, by field name.
    pub complex: Vec<(String, ColumnarBlocks)>,
    /// Values of every non-complex field, by field name.
    pub primitive: Vec<(String, Vec<FieldValue>)>,
}

impl PartitionOutput {
    pub fn complex_column(&self, name: &str) -> Option<&ColumnarBlocks> {
        self.complex
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, blocks)| blocks)
    }

    pub fn primitive_column(&self, name: &str) -> Option<&[FieldValue]> {
        self.primitive
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, values)| values.as_slice())
    }
}

/// Writer that transposes complex fields into output columns in memory.
#[derive(Debug, Clone, Default)]
pub struct ColumnarWriter {
    outputs: Arc<Mutex<Vec<PartitionOutput>>>,
}

impl ColumnarWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed partitions, ordered by partition index.
    pub fn outputs(&self) -> Vec<PartitionOutput> {
        let mut outputs = self.outputs.lock().clone();
        outputs.sort_by_key(|o| o.partition);
        outputs
    }
}

impl BatchWriter for ColumnarWriter {
    fn open_partition(
        &self,
        partition: usize,
        fields: &[DataField],
    ) -> Result<Box<dyn PartitionWriter>, StageExecutionError> {
        let columns = fields
            .iter()
            .map(|field| match &field.data_type {
                DataType::Complex(schema) => ColumnarTransposer::new(Arc::clone(schema))
                    .map(|transposer| FieldSink::Complex(field.name.clone(), transposer))
                    .map_err(|e| StageExecutionError::Writer {
                        partition,
                        message: format!("column '{}': {}", field.name, e),
                    }),
                _ => Ok(FieldSink::Primitive(field.name.clone(), Vec::new())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(target: "ingest::writer", partition, fields = fields.len(), "Partition opened");
        Ok(Box::new(ColumnarPartitionWriter {
            partition,
            rows: 0,
            columns,
            outputs: Arc::clone(&self.outputs),
        }))
    }
}

enum FieldSink {
    Complex(String, ColumnarTransposer),
    Primitive(String, Vec<FieldValue>),
}

struct ColumnarPartitionWriter {
    partition: usize,
    rows: usize,
    columns: Vec<FieldSink>,
    outputs: Arc<Mutex<Vec<PartitionOutput>>>,
}

impl PartitionWriter for ColumnarPartitionWriter {
    fn write_batch(&mut self, batch: &RowBatch) -> Result<(), StageExecutionError> {
        for row in batch.iter() {
            if row.len() != self.columns.len() {
                return Err(StageExecutionError::Writer {
                    partition: self.partition,
                    message: format!(
                        "row {} has {} fields, expected {}",
                        self.rows,
                        row.len(),
                        self.columns.len()
                    ),
                });
            }
            for (sink, value) in self.columns.iter_mut().zip(row.values()) {
                match sink {
                    FieldSink::Complex(name, transposer) => {
                        let packed = value.as_bytes().ok_or_else(|| StageExecutionError::Writer {
                            partition: self.partition,
                            message: format!("complex column '{}' was not converted", name),
                        })?;
                        transposer
                            .push_row(packed)
                            .map_err(|e| StageExecutionError::Writer {
                                partition: self.partition,
                                message: format!("column '{}' row {}: {}", name, self.rows, e),
                            })?;
                    }
                    FieldSink::Primitive(_, values) => values.push(value.clone()),
                }
            }
            self.rows += 1;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), StageExecutionError> {
        let mut output = PartitionOutput {
            partition: self.partition,
            rows: self.rows,
            ..Default::default()
        };
        for sink in self.columns {
            match sink {
                FieldSink::Complex(name, transposer) => {
                    output.complex.push((name, transposer.into_blocks()))
                }
                FieldSink::Primitive(name, values) => output.primitive.push((name, values)),
            }
        }
        info!(
            target: "ingest::writer",
            partition = self.partition,
            rows = self.rows,
            "Partition written"
        );
        self.outputs.lock().push(output);
        Ok(())
    }
}
