use crate::engine::errors::StageExecutionError;
use crate::engine::pipeline::step::{DataLoadStep, RowBatchIter, StepState};
use crate::engine::pipeline::{DataField, Row, RowBatch};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Per-partition row transform. One instance is handed to each partition,
/// so implementations may keep mutable state without synchronization.
pub trait RowProcessor: Send {
    fn process_row(&mut self, row: Row) -> Result<Row, StageExecutionError>;

    /// Keeps batch boundaries and row order.
    fn process_row_batch(&mut self, batch: RowBatch) -> Result<RowBatch, StageExecutionError> {
        let mut out = RowBatch::with_capacity(batch.len());
        for row in batch {
            out.add_row(self.process_row(row)?);
        }
        Ok(out)
    }
}

/// Step-specific behaviour plugged into a [`ProcessorStep`].
pub trait StepLogic: Send {
    type Processor: RowProcessor + 'static;

    fn name(&self) -> &str;

    fn output(&self, input: &[DataField]) -> Vec<DataField> {
        input.to_vec()
    }

    /// Acquires resources. `input` is the child's output layout.
    fn initialize(&mut self, _input: &[DataField]) -> Result<(), StageExecutionError> {
        Ok(())
    }

    /// Builds the processor for one partition. Must not depend on which
    /// partition asks.
    fn processor(&self) -> Result<Self::Processor, StageExecutionError>;

    fn finish(&mut self) -> Result<(), StageExecutionError> {
        Ok(())
    }

    fn close(&mut self) {}
}

/// Step that lazily maps every batch of every child partition through `L`.
pub struct ProcessorStep<L: StepLogic> {
    logic: L,
    child: Box<dyn DataLoadStep>,
    output: Vec<DataField>,
    state: StepState,
}

impl<L: StepLogic> ProcessorStep<L> {
    pub fn new(logic: L, child: Box<dyn DataLoadStep>) -> Self {
        let output = logic.output(child.output());
        Self {
            logic,
            child,
            output,
            state: StepState::Created,
        }
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn state(&self) -> StepState {
        self.state
    }
}

impl<L: StepLogic> DataLoadStep for ProcessorStep<L> {
    fn name(&self) -> &str {
        self.logic.name()
    }

    fn output(&self) -> &[DataField] {
        &self.output
    }

    fn initialize(&mut self) -> Result<(), StageExecutionError> {
        self.state
            .require(self.logic.name(), &[StepState::Created], "initialize")?;
        self.child.initialize()?;
        self.logic.initialize(self.child.output())?;
        self.state = StepState::Initialized;
        debug!(target: "ingest::pipeline", step = self.logic.name(), "Step initialized");
        Ok(())
    }

    fn execute(&mut self) -> Result<Vec<RowBatchIter>, StageExecutionError> {
        self.state
            .require(self.logic.name(), &[StepState::Initialized], "execute")?;
        let child_iters = self.child.execute()?;
        let step: Arc<str> = Arc::from(self.logic.name());

        let mut iters: Vec<RowBatchIter> = Vec::with_capacity(child_iters.len());
        for inner in child_iters {
            let processor = self.logic.processor()?;
            iters.push(Box::new(ProcessedBatches {
                step: Arc::clone(&step),
                inner,
                processor,
                batches: 0,
                done: false,
            }));
        }
        self.state = StepState::Executing;
        info!(
            target: "ingest::pipeline",
            step = self.logic.name(),
            partitions = iters.len(),
            "Step executing"
        );
        Ok(iters)
    }

    fn finish(&mut self) -> Result<(), StageExecutionError> {
        if self.state == StepState::Finished {
            return Ok(());
        }
        self.state.require(
            self.logic.name(),
            &[StepState::Initialized, StepState::Executing],
            "finish",
        )?;
        self.child.finish()?;
        self.logic.finish()?;
        self.state = StepState::Finished;
        debug!(target: "ingest::pipeline", step = self.logic.name(), "Step finished");
        Ok(())
    }

    fn close(&mut self) {
        if self.state == StepState::Closed {
            return;
        }
        if self.state == StepState::Executing {
            warn!(
                target: "ingest::pipeline",
                step = self.logic.name(),
                "Closing step that never finished"
            );
        }
        self.logic.close();
        self.child.close();
        self.state = StepState::Closed;
        debug!(target: "ingest::pipeline", step = self.logic.name(), "Step closed");
    }
}

impl<L: StepLogic> Drop for ProcessorStep<L> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Pull-based view of one child partition with a step's processor applied.
/// The first error ends the sequence.
struct ProcessedBatches<P: RowProcessor> {
    step: Arc<str>,
    inner: RowBatchIter,
    processor: P,
    batches: usize,
    done: bool,
}

impl<P: RowProcessor> Iterator for ProcessedBatches<P> {
    type Item = Result<RowBatch, StageExecutionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = match self.inner.next()? {
            Ok(batch) => self.processor.process_row_batch(batch),
            Err(e) => Err(e),
        };
        match &result {
            Ok(batch) => {
                self.batches += 1;
                if tracing::enabled!(tracing::Level::TRACE) {
                    trace!(
                        target: "ingest::pipeline",
                        step = %self.step,
                        batch = self.batches,
                        rows = batch.len(),
                        "Processed batch"
                    );
                }
            }
            Err(_) => {
                self.done = true;
                debug!(
                    target: "ingest::pipeline",
                    step = %self.step,
                    after_batches = self.batches,
                    "Aborting partition sequence"
                );
            }
        }
        Some(result)
    }
}
