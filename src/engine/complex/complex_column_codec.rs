use crate::engine::complex::dictionary::SurrogateKeyGenerator;
use crate::engine::complex::{
    CodecOptions, ColumnarTransposer, ComplexColumnMetadata, GenericType, KeyGenerator,
};
use crate::engine::errors::CodecError;
use std::sync::Arc;

/// Encoding entry points for one complex column.
///
/// The schema is immutable and shared; per-run counters live in the
/// [`ColumnarTransposer`] each partition creates.
#[derive(Debug, Clone)]
pub struct ComplexColumnCodec {
    schema: Arc<GenericType>,
    options: CodecOptions,
}

impl ComplexColumnCodec {
    pub fn new(schema: Arc<GenericType>, options: CodecOptions) -> Result<Self, CodecError> {
        schema.validate()?;
        schema.check_output_layout()?;
        Ok(Self { schema, options })
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn schema(&self) -> &Arc<GenericType> {
        &self.schema
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Text to surrogate-key stream.
    pub fn encode(
        &self,
        text: &str,
        dictionary: &dyn SurrogateKeyGenerator,
    ) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        self.schema
            .parse_string_and_write_bytes(text, &self.options, 0, dictionary, &mut out)?;
        Ok(out)
    }

    /// Surrogate-key stream to fixed-width key stream.
    pub fn bit_pack(
        &self,
        encoded: &[u8],
        generators: &[KeyGenerator],
    ) -> Result<Vec<u8>, CodecError> {
        let mut input = encoded;
        let mut out = Vec::with_capacity(encoded.len());
        self.schema
            .parse_and_bit_pack(&mut input, generators, &mut out)?;
        if !input.is_empty() {
            return Err(CodecError::Parsing {
                column: self.name().to_string(),
                message: format!("{} trailing bytes after encoded value", input.len()),
            });
        }
        Ok(out)
    }

    pub fn encode_and_pack(
        &self,
        text: &str,
        dictionary: &dyn SurrogateKeyGenerator,
        generators: &[KeyGenerator],
    ) -> Result<Vec<u8>, CodecError> {
        let encoded = self.encode(text, dictionary)?;
        self.bit_pack(&encoded, generators)
    }

    pub fn new_transposer(&self) -> Result<ColumnarTransposer, CodecError> {
        ColumnarTransposer::new(Arc::clone(&self.schema))
    }

    /// Key layouts sized from the cardinality the dictionary has learned,
    /// indexed by surrogate index. Slots of other columns keep the default width.
    pub fn key_generators(&self, dictionary: &dyn SurrogateKeyGenerator) -> Vec<KeyGenerator> {
        let leaves = self.schema.leaf_descendants();
        let slots = leaves
            .iter()
            .filter_map(|leaf| leaf.surrogate_index())
            .max()
            .map_or(0, |max| max + 1);
        let mut generators = vec![KeyGenerator::default(); slots];
        for leaf in leaves {
            if let Some(index) = leaf.surrogate_index() {
                generators[index] =
                    KeyGenerator::for_cardinality(dictionary.max_surrogate_key(leaf.column_id()));
            }
        }
        generators
    }

    /// Metadata for this column's output columns after the load has finished.
    pub fn column_metadata(
        &self,
        dictionary: &dyn SurrogateKeyGenerator,
        generators: &[KeyGenerator],
    ) -> Result<ComplexColumnMetadata, CodecError> {
        let agg_key_block = vec![true; generators.len()];
        let key_sizes: Vec<usize> = generators
            .iter()
            .map(KeyGenerator::key_size_in_bytes)
            .collect();
        let mut cardinality = vec![0u32; generators.len()];
        for leaf in self.schema.leaf_descendants() {
            if let Some(slot) = leaf.surrogate_index().and_then(|i| cardinality.get_mut(i)) {
                *slot = dictionary.max_surrogate_key(leaf.column_id());
            }
        }
        ComplexColumnMetadata::aggregate(&self.schema, &agg_key_block, &key_sizes, &cardinality)
    }
}
