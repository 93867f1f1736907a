use crate::engine::complex::byte_reader::{read_count, read_u32, write_count};
use crate::engine::complex::{GenericType, KeyGenerator, TypeKind};
use crate::engine::errors::CodecError;
use std::io::Write;

impl GenericType {
    /// Key layout for this leaf, looked up by surrogate index.
    pub fn key_generator<'g>(
        &self,
        generators: &'g [KeyGenerator],
    ) -> Result<&'g KeyGenerator, CodecError> {
        let index = self.surrogate_index().ok_or_else(|| CodecError::Parsing {
            column: self.name().to_string(),
            message: "key layout requested for a non-primitive column".to_string(),
        })?;
        generators
            .get(index)
            .ok_or_else(|| CodecError::MissingKeyGenerator {
                column: self.name().to_string(),
                surrogate_index: index,
            })
    }

    /// Fixed key width of the leaf reached through this node.
    ///
    /// Arrays delegate to their element; structs have no single leaf and
    /// return `None`.
    pub fn leaf_key_width(&self, generators: &[KeyGenerator]) -> Result<Option<usize>, CodecError> {
        match self.kind() {
            TypeKind::Primitive { .. } => Ok(Some(self.key_generator(generators)?.key_size_in_bytes())),
            TypeKind::Array { .. } => self.element()?.leaf_key_width(generators),
            TypeKind::Struct { .. } => Ok(None),
        }
    }

    /// Re-reads a surrogate stream and rewrites it with fixed-width keys,
    /// adding `[i32 keyWidth]` ahead of every immediate primitive child.
    pub fn parse_and_bit_pack<W: Write>(
        &self,
        input: &mut &[u8],
        generators: &[KeyGenerator],
        sink: &mut W,
    ) -> Result<(), CodecError> {
        match self.kind() {
            TypeKind::Array { .. } => {
                let element = self.element()?;
                let count = read_count(input, self.name())?;
                write_count(sink, count, self.name())?;
                if element.is_leaf() {
                    let width = element.key_generator(generators)?.key_size_in_bytes();
                    write_count(sink, width, element.name())?;
                }
                for _ in 0..count {
                    element.parse_and_bit_pack(input, generators, sink)?;
                }
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
                write_count(sink, count, self.name())?;
                for field in &fields[..count] {
                    if field.is_leaf() {
                        let width = field.key_generator(generators)?.key_size_in_bytes();
                        write_count(sink, width, field.name())?;
                    }
                    field.parse_and_bit_pack(input, generators, sink)?;
                }
                Ok(())
            }
            TypeKind::Primitive { .. } => {
                let key = read_u32(input, self.name())?;
                self.key_generator(generators)?.write_key(key, sink)
            }
        }
    }
}
