use crate::engine::complex::{ComplexColumnCodec, InMemoryDictionary};
use crate::engine::errors::StageExecutionError;
use crate::engine::pipeline::{
    BatchWriter, ColumnarWriter, ComplexConverter, DataField, DataType, FieldValue, InputStep,
    LoadRuntime, PartitionWriter, ProcessorStep, Row, RowBatch, RowProcessor, StepLogic,
};
use crate::logging;
use crate::test_helpers::factory::Factory;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

fn runtime(texts: &[&str], partitions: usize) -> LoadRuntime {
    let schema = Factory::generic_type()
        .with_column("tags")
        .with_type("array<string>")
        .create_shared();
    let options = Factory::codec_options().create();
    let codec = ComplexColumnCodec::new(Arc::clone(&schema), options.clone()).unwrap();

    let dictionary = Arc::new(InMemoryDictionary::new());
    for text in texts {
        codec.encode(text, dictionary.as_ref()).unwrap();
    }
    let generators = codec.key_generators(dictionary.as_ref());

    let fields = vec![
        DataField::new("id", DataType::Long),
        DataField::new("tags", DataType::Complex(schema)),
    ];
    let rows = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Row::new(vec![FieldValue::Long(i as i64), FieldValue::from(*text)]))
        .collect();
    let input = InputStep::from_rows(fields, rows, 1, partitions);
    let converter = ComplexConverter::new(options, dictionary, generators).into_step(Box::new(input));
    LoadRuntime::new(Box::new(converter))
}

#[test]
fn loads_every_partition_into_columns() {
    logging::init_for_tests();
    let writer = ColumnarWriter::new();

    let summary = runtime(&["a$b", "c", "", "d$a"], 2).run(&writer).unwrap();

    assert_eq!(summary.total_rows(), 4);
    assert_eq!(summary.total_batches(), 4);
    assert_eq!(summary.partitions.len(), 2);

    let outputs = writer.outputs();
    let first = outputs[0].complex_column("tags").unwrap();
    assert_eq!(first.column(0), &[ints(&[2, 0]), ints(&[1, 2])]);
    assert_eq!(first.column(1), &[vec![2u8], vec![3], vec![1]]);
    assert_eq!(
        outputs[0].primitive_column("id"),
        Some(&[FieldValue::Long(0), FieldValue::Long(2)][..])
    );

    let second = outputs[1].complex_column("tags").unwrap();
    assert_eq!(second.column(0), &[ints(&[1, 0]), ints(&[2, 1])]);
    assert_eq!(second.column(1), &[vec![4u8], vec![5], vec![2]]);
}

#[test]
fn closed_chain_cannot_rerun() {
    let writer = ColumnarWriter::new();
    let mut runtime = runtime(&["a"], 1);

    runtime.run(&writer).unwrap();
    let err = runtime.run(&writer).unwrap_err();

    assert!(matches!(err, StageExecutionError::InvalidState { .. }));
}

struct PanickingWriter;

struct PanickingPartition;

impl BatchWriter for PanickingWriter {
    fn open_partition(
        &self,
        _partition: usize,
        _fields: &[DataField],
    ) -> Result<Box<dyn PartitionWriter>, StageExecutionError> {
        Ok(Box::new(PanickingPartition))
    }
}

impl PartitionWriter for PanickingPartition {
    fn write_batch(&mut self, _batch: &RowBatch) -> Result<(), StageExecutionError> {
        panic!("disk on fire");
    }

    fn close(self: Box<Self>) -> Result<(), StageExecutionError> {
        Ok(())
    }
}

#[test]
fn worker_panic_is_reported_as_error() {
    let err = runtime(&["a", "b"], 2).run(&PanickingWriter).unwrap_err();

    assert!(matches!(err, StageExecutionError::Panicked { .. }));
}

/// Passes rows through and counts how often the step is closed.
struct CloseCounter {
    closed: Arc<AtomicUsize>,
}

struct Identity;

impl RowProcessor for Identity {
    fn process_row(&mut self, row: Row) -> Result<Row, StageExecutionError> {
        Ok(row)
    }
}

impl StepLogic for CloseCounter {
    type Processor = Identity;

    fn name(&self) -> &str {
        "close_counter"
    }

    fn processor(&self) -> Result<Identity, StageExecutionError> {
        Ok(Identity)
    }

    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn processing_error_aborts_and_closes_the_chain() {
    let schema = Factory::generic_type().with_type("array<string>").create_shared();
    let fields = vec![DataField::new("col", DataType::Complex(schema))];
    let rows = vec![Row::new(vec![FieldValue::Long(1)])];
    let input = InputStep::from_rows(fields, rows, 10, 1);
    let closed = Arc::new(AtomicUsize::new(0));
    let counter = ProcessorStep::new(
        CloseCounter {
            closed: Arc::clone(&closed),
        },
        Box::new(input),
    );
    let converter = ComplexConverter::new(
        Factory::codec_options().create(),
        Arc::new(InMemoryDictionary::new()),
        vec![],
    )
    .into_step(Box::new(counter));

    let mut runtime = LoadRuntime::new(Box::new(converter));
    let err = runtime.run(&ColumnarWriter::new()).unwrap_err();

    assert!(matches!(err, StageExecutionError::Processing { .. }));
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    drop(runtime);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}
