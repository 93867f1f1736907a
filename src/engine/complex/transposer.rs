use crate::engine::complex::byte_reader::{read_count, read_slice};
use crate::engine::complex::{ColumnarBlocks, ColumnarState, GenericType, TypeKind};
use crate::engine::errors::CodecError;
use std::sync::Arc;
use tracing::trace;

/// Width of the `[count][offset]` block each non-leaf level emits per element.
pub const HEADER_BLOCK_LEN: usize = 8;

fn header_block(count: usize, offset: u32, column: &str) -> Result<Vec<u8>, CodecError> {
    let count = i32::try_from(count).map_err(|_| CodecError::Parsing {
        column: column.to_string(),
        message: format!("element count {} exceeds int32", count),
    })?;
    let mut block = Vec::with_capacity(HEADER_BLOCK_LEN);
    block.extend_from_slice(&count.to_be_bytes());
    block.extend_from_slice(&offset.to_be_bytes());
    Ok(block)
}

impl GenericType {
    /// Splits one bit-packed element into per-output-column blocks.
    ///
    /// Non-leaf levels append `[count][offset]`, where offset is the first
    /// child's counter before this element. Leaves append their raw key bytes.
    pub fn columnar_data_for_complex_type(
        &self,
        input: &mut &[u8],
        state: &mut ColumnarState,
        blocks: &mut ColumnarBlocks,
    ) -> Result<(), CodecError> {
        match self.kind() {
            TypeKind::Array { .. } => {
                let element = self.element()?;
                let count = read_count(input, self.name())?;
                let offset = if count == 0 {
                    0
                } else {
                    state.data_counter(element)
                };
                blocks.push(
                    self.output_array_index(),
                    header_block(count, offset, self.name())?,
                );
                if element.is_leaf() {
                    let width = read_count(input, element.name())?;
                    state.set_key_size(element, width);
                }
                for _ in 0..count {
                    element.columnar_data_for_complex_type(input, state, blocks)?;
                }
                state.increment(self);
                Ok(())
            }
            TypeKind::Struct { fields } => {
                let count = read_count(input, self.name())?;
                if count > fields.len() {
                    return Err(CodecError::Parsing {
                        column: self.name().to_string(),
                        message: format!("{} members for a struct of {} fields", count, fields.len()),
                    });
                }
                let offset = match fields.first() {
                    Some(first) if count > 0 => state.data_counter(first),
                    _ => 0,
                };
                blocks.push(
                    self.output_array_index(),
                    header_block(count, offset, self.name())?,
                );
                for field in &fields[..count] {
                    if field.is_leaf() {
                        let width = read_count(input, field.name())?;
                        state.set_key_size(field, width);
                    }
                    field.columnar_data_for_complex_type(input, state, blocks)?;
                }
                state.increment(self);
                Ok(())
            }
            TypeKind::Primitive { .. } => {
                let key = read_slice(input, state.key_size(self), self.name())?;
                blocks.push(self.output_array_index(), key.to_vec());
                state.increment(self);
                Ok(())
            }
        }
    }
}

/// Transposes bit-packed rows of one complex column for a single partition.
#[derive(Debug)]
pub struct ColumnarTransposer {
    schema: Arc<GenericType>,
    state: ColumnarState,
    blocks: ColumnarBlocks,
    rows: usize,
}

impl ColumnarTransposer {
    /// Fails unless `schema` is complete and flattened.
    pub fn new(schema: Arc<GenericType>) -> Result<Self, CodecError> {
        schema.validate()?;
        schema.check_output_layout()?;
        let state = ColumnarState::for_schema(&schema);
        let blocks = ColumnarBlocks::for_schema(&schema);
        Ok(Self {
            schema,
            state,
            blocks,
            rows: 0,
        })
    }

    /// Appends one row; the blob must be consumed exactly.
    pub fn push_row(&mut self, packed: &[u8]) -> Result<(), CodecError> {
        let mut input = packed;
        self.schema
            .columnar_data_for_complex_type(&mut input, &mut self.state, &mut self.blocks)?;
        if !input.is_empty() {
            return Err(CodecError::Parsing {
                column: self.schema.name().to_string(),
                message: format!("{} trailing bytes after row", input.len()),
            });
        }
        self.rows += 1;
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(
                target: "ingest::codec",
                column = self.schema.name(),
                rows = self.rows,
                "Transposed row"
            );
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn state(&self) -> &ColumnarState {
        &self.state
    }

    pub fn blocks(&self) -> &ColumnarBlocks {
        &self.blocks
    }

    pub fn into_blocks(self) -> ColumnarBlocks {
        self.blocks
    }
}
