use crate::engine::complex::{
    CodecOptions, ComplexColumnCodec, KeyGenerator, SurrogateKeyGenerator,
};
use crate::engine::errors::StageExecutionError;
use crate::engine::pipeline::processor_step::{ProcessorStep, RowProcessor, StepLogic};
use crate::engine::pipeline::{DataField, DataLoadStep, DataType, FieldValue, Row};
use std::sync::Arc;
use tracing::info;

const STEP_NAME: &str = "complex_converter";

/// Step that replaces every complex field's text with its bit-packed blob.
pub type ComplexConverterStep = ProcessorStep<ComplexConverter>;

pub struct ComplexConverter {
    options: CodecOptions,
    dictionary: Arc<dyn SurrogateKeyGenerator>,
    key_generators: Arc<[KeyGenerator]>,
    codecs: Arc<[(usize, ComplexColumnCodec)]>,
}

impl ComplexConverter {
    /// `key_generators` is indexed by leaf surrogate index.
    pub fn new(
        options: CodecOptions,
        dictionary: Arc<dyn SurrogateKeyGenerator>,
        key_generators: Vec<KeyGenerator>,
    ) -> Self {
        Self {
            options,
            dictionary,
            key_generators: key_generators.into(),
            codecs: Arc::from(Vec::new()),
        }
    }

    pub fn into_step(self, child: Box<dyn DataLoadStep>) -> ComplexConverterStep {
        ProcessorStep::new(self, child)
    }

    pub fn codecs(&self) -> impl Iterator<Item = &ComplexColumnCodec> {
        self.codecs.iter().map(|(_, codec)| codec)
    }
}

impl StepLogic for ComplexConverter {
    type Processor = ComplexRowProcessor;

    fn name(&self) -> &str {
        STEP_NAME
    }

    fn initialize(&mut self, input: &[DataField]) -> Result<(), StageExecutionError> {
        let mut codecs = Vec::new();
        for (index, field) in input.iter().enumerate() {
            if let DataType::Complex(schema) = &field.data_type {
                let codec = ComplexColumnCodec::new(Arc::clone(schema), self.options.clone())
                    .map_err(|source| StageExecutionError::Codec {
                        step: STEP_NAME.to_string(),
                        column: field.name.clone(),
                        source,
                    })?;
                codecs.push((index, codec));
            }
        }
        info!(
            target: "ingest::pipeline",
            step = STEP_NAME,
            complex_columns = codecs.len(),
            "Complex converter initialized"
        );
        self.codecs = codecs.into();
        Ok(())
    }

    fn processor(&self) -> Result<ComplexRowProcessor, StageExecutionError> {
        Ok(ComplexRowProcessor {
            dictionary: Arc::clone(&self.dictionary),
            key_generators: Arc::clone(&self.key_generators),
            codecs: Arc::clone(&self.codecs),
        })
    }

    fn finish(&mut self) -> Result<(), StageExecutionError> {
        for (_, codec) in self.codecs.iter() {
            for leaf in codec.schema().leaf_descendants() {
                info!(
                    target: "ingest::dictionary",
                    column = leaf.name(),
                    cardinality = self.dictionary.max_surrogate_key(leaf.column_id()),
                    "Dictionary column complete"
                );
            }
        }
        Ok(())
    }
}

pub struct ComplexRowProcessor {
    dictionary: Arc<dyn SurrogateKeyGenerator>,
    key_generators: Arc<[KeyGenerator]>,
    codecs: Arc<[(usize, ComplexColumnCodec)]>,
}

impl RowProcessor for ComplexRowProcessor {
    fn process_row(&mut self, mut row: Row) -> Result<Row, StageExecutionError> {
        for (index, codec) in self.codecs.iter() {
            let text = match row.get(*index) {
                Some(FieldValue::Text(text)) => text.as_str(),
                Some(FieldValue::Null) => "",
                Some(other) => {
                    return Err(StageExecutionError::Processing {
                        step: STEP_NAME.to_string(),
                        message: format!(
                            "column '{}' expects text, got {:?}",
                            codec.name(),
                            other
                        ),
                    });
                }
                None => {
                    return Err(StageExecutionError::Processing {
                        step: STEP_NAME.to_string(),
                        message: format!(
                            "row has {} fields, column '{}' is at {}",
                            row.len(),
                            codec.name(),
                            index
                        ),
                    });
                }
            };
            let packed = codec
                .encode_and_pack(text, self.dictionary.as_ref(), &self.key_generators)
                .map_err(|source| StageExecutionError::Codec {
                    step: STEP_NAME.to_string(),
                    column: codec.name().to_string(),
                    source,
                })?;
            row.replace(*index, FieldValue::Bytes(packed));
        }
        Ok(row)
    }
}
