use crate::engine::errors::StageExecutionError;
use crate::engine::pipeline::step::{DataLoadStep, RowBatchIter, StepState};
use crate::engine::pipeline::{DataField, Row, RowBatch};
use tracing::{debug, info};

/// Source of a load: hands out pre-split partitions of row batches.
pub struct InputStep {
    fields: Vec<DataField>,
    partitions: Option<Vec<Vec<RowBatch>>>,
    state: StepState,
}

impl InputStep {
    pub fn new(fields: Vec<DataField>, partitions: Vec<Vec<RowBatch>>) -> Self {
        Self {
            fields,
            partitions: Some(partitions),
            state: StepState::Created,
        }
    }

    /// Cuts `rows` into batches of `batch_size` and deals them round-robin
    /// over `partitions`, so each partition keeps input order.
    pub fn from_rows(
        fields: Vec<DataField>,
        rows: Vec<Row>,
        batch_size: usize,
        partitions: usize,
    ) -> Self {
        let batch_size = batch_size.max(1);
        let partition_count = partitions.max(1);
        let mut split: Vec<Vec<RowBatch>> = vec![Vec::new(); partition_count];

        let mut current = RowBatch::with_capacity(batch_size);
        let mut next_partition = 0;
        for row in rows {
            current.add_row(row);
            if current.len() == batch_size {
                let full = std::mem::replace(&mut current, RowBatch::with_capacity(batch_size));
                split[next_partition].push(full);
                next_partition = (next_partition + 1) % partition_count;
            }
        }
        if !current.is_empty() {
            split[next_partition].push(current);
        }
        Self::new(fields, split)
    }
}

impl DataLoadStep for InputStep {
    fn name(&self) -> &str {
        "input"
    }

    fn output(&self) -> &[DataField] {
        &self.fields
    }

    fn initialize(&mut self) -> Result<(), StageExecutionError> {
        self.state.require("input", &[StepState::Created], "initialize")?;
        self.state = StepState::Initialized;
        Ok(())
    }

    fn execute(&mut self) -> Result<Vec<RowBatchIter>, StageExecutionError> {
        self.state.require("input", &[StepState::Initialized], "execute")?;
        let partitions = self.partitions.take().unwrap_or_default();
        info!(
            target: "ingest::pipeline",
            partitions = partitions.len(),
            batches = partitions.iter().map(Vec::len).sum::<usize>(),
            "Input step executing"
        );
        self.state = StepState::Executing;
        Ok(partitions
            .into_iter()
            .map(|batches| {
                Box::new(batches.into_iter().map(Ok::<RowBatch, StageExecutionError>))
                    as RowBatchIter
            })
            .collect())
    }

    fn finish(&mut self) -> Result<(), StageExecutionError> {
        if self.state == StepState::Finished {
            return Ok(());
        }
        self.state.require(
            "input",
            &[StepState::Initialized, StepState::Executing],
            "finish",
        )?;
        self.state = StepState::Finished;
        Ok(())
    }

    fn close(&mut self) {
        if self.state == StepState::Closed {
            return;
        }
        self.partitions = None;
        self.state = StepState::Closed;
        debug!(target: "ingest::pipeline", step = "input", "Step closed");
    }
}
