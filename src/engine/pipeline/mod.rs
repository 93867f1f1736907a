pub mod complex_converter_step;
pub mod input_step;
pub mod processor_step;
pub mod row;
pub mod runtime;
pub mod step;
pub mod writer;

pub use complex_converter_step::{ComplexConverter, ComplexConverterStep};
pub use input_step::InputStep;
pub use processor_step::{ProcessorStep, RowProcessor, StepLogic};
pub use row::{DataField, DataType, FieldValue, Row, RowBatch};
pub use runtime::{LoadRuntime, LoadSummary, PartitionSummary};
pub use step::{DataLoadStep, RowBatchIter, StepState};
pub use writer::{BatchWriter, ColumnarWriter, PartitionOutput, PartitionWriter};

#[cfg(test)]
mod row_test;
#[cfg(test)]
mod runtime_test;
#[cfg(test)]
mod writer_test;
