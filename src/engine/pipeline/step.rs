use crate::engine::errors::StageExecutionError;
use crate::engine::pipeline::{DataField, RowBatch};
use std::fmt;

/// Lazy batch sequence of one partition.
pub type RowBatchIter = Box<dyn Iterator<Item = Result<RowBatch, StageExecutionError>> + Send>;

/// One stage of a load: consumes its child's partitions and produces the same number.
///
/// Lifecycle: `initialize` once, `execute` once, drain every returned
/// sequence (or drop it), then `finish` and `close`. `close` must be safe at
/// any point and more than once.
pub trait DataLoadStep: Send {
    fn name(&self) -> &str;

    /// Field layout of the rows this step emits.
    fn output(&self) -> &[DataField];

    fn initialize(&mut self) -> Result<(), StageExecutionError>;

    fn execute(&mut self) -> Result<Vec<RowBatchIter>, StageExecutionError>;

    fn finish(&mut self) -> Result<(), StageExecutionError>;

    fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Created,
    Initialized,
    Executing,
    Finished,
    Closed,
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepState::Created => "created",
            StepState::Initialized => "initialized",
            StepState::Executing => "executing",
            StepState::Finished => "finished",
            StepState::Closed => "closed",
        };
        f.write_str(s)
    }
}

impl StepState {
    /// Fails unless the step is in one of `allowed`.
    pub fn require(
        self,
        step: &str,
        allowed: &[StepState],
        op: &'static str,
    ) -> Result<(), StageExecutionError> {
        if allowed.contains(&self) {
            return Ok(());
        }
        if self == StepState::Created {
            return Err(StageExecutionError::NotInitialized(step.to_string()));
        }
        Err(StageExecutionError::InvalidState {
            step: step.to_string(),
            state: self.to_string(),
            op,
        })
    }
}
