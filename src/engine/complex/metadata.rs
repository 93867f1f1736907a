use crate::engine::complex::GenericType;
use crate::engine::complex::transposer::HEADER_BLOCK_LEN;
use crate::engine::errors::CodecError;

impl GenericType {
    /// Pushes `complex_value` for every non-leaf node and the leaf's entry
    /// from `leaf_values` for every primitive, in output-column order.
    fn fill_metadata<T: Copy>(
        &self,
        out: &mut Vec<T>,
        complex_value: T,
        leaf_values: &[T],
    ) -> Result<(), CodecError> {
        if let Some(index) = self.surrogate_index() {
            let value = leaf_values
                .get(index)
                .ok_or_else(|| CodecError::MissingColumnMetadata {
                    column: self.name().to_string(),
                    surrogate_index: index,
                })?;
            out.push(*value);
            return Ok(());
        }
        out.push(complex_value);
        for child in self.children() {
            child.fill_metadata(out, complex_value, leaf_values)?;
        }
        Ok(())
    }

    /// Complex levels are never dictionary key blocks.
    pub fn fill_agg_key_block(
        &self,
        out: &mut Vec<bool>,
        agg_key_block: &[bool],
    ) -> Result<(), CodecError> {
        self.fill_metadata(out, false, agg_key_block)
    }

    /// Complex levels store header blocks of [`HEADER_BLOCK_LEN`] bytes.
    pub fn fill_block_key_size(
        &self,
        out: &mut Vec<usize>,
        primitive_block_key_size: &[usize],
    ) -> Result<(), CodecError> {
        self.fill_metadata(out, HEADER_BLOCK_LEN, primitive_block_key_size)
    }

    /// Complex levels have no cardinality of their own.
    pub fn fill_cardinality_after_data_load(
        &self,
        out: &mut Vec<u32>,
        max_surrogate_keys: &[u32],
    ) -> Result<(), CodecError> {
        self.fill_metadata(out, 0, max_surrogate_keys)
    }
}

/// Per-output-column metadata of one complex column, aggregated once after load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplexColumnMetadata {
    pub agg_key_block: Vec<bool>,
    pub block_key_size: Vec<usize>,
    pub cardinality: Vec<u32>,
}

impl ComplexColumnMetadata {
    pub fn aggregate(
        schema: &GenericType,
        agg_key_block: &[bool],
        primitive_block_key_size: &[usize],
        max_surrogate_keys: &[u32],
    ) -> Result<Self, CodecError> {
        let mut meta = Self::default();
        schema.fill_agg_key_block(&mut meta.agg_key_block, agg_key_block)?;
        schema.fill_block_key_size(&mut meta.block_key_size, primitive_block_key_size)?;
        schema.fill_cardinality_after_data_load(&mut meta.cardinality, max_surrogate_keys)?;
        Ok(meta)
    }
}
