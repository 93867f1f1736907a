use crate::engine::complex::byte_reader::write_count;
use crate::engine::complex::dictionary::{NULL_SURROGATE_KEY, SurrogateKeyGenerator};
use crate::engine::complex::{CodecOptions, GenericType, TypeKind};
use crate::engine::errors::CodecError;
use std::io::Write;

impl GenericType {
    /// Splits `input` on the delimiter for `delimiter_index` and writes the
    /// surrogate-key stream for this subtree to `sink`.
    ///
    /// Non-leaf levels write `[i32 count]` followed by each element's stream.
    /// Leaves write their 4-byte surrogate key. A null array still carries one
    /// null element.
    pub fn parse_string_and_write_bytes<W: Write>(
        &self,
        input: &str,
        options: &CodecOptions,
        delimiter_index: usize,
        dictionary: &dyn SurrogateKeyGenerator,
        sink: &mut W,
    ) -> Result<(), CodecError> {
        match self.kind() {
            TypeKind::Array { .. } => {
                let element = self.element()?;
                if options.is_null_value(input) {
                    write_count(sink, 1, self.name())?;
                    return element.parse_string_and_write_bytes(
                        options.null_member(),
                        options,
                        delimiter_index,
                        dictionary,
                        sink,
                    );
                }

                let fragments: Vec<&str> = input.split(options.delimiter(delimiter_index)).collect();
                write_count(sink, fragments.len(), self.name())?;
                let next = options.next_delimiter_index(delimiter_index);
                for fragment in fragments {
                    element.parse_string_and_write_bytes(fragment, options, next, dictionary, sink)?;
                }
                Ok(())
            }
            TypeKind::Struct { fields } => {
                write_count(sink, fields.len(), self.name())?;
                if options.is_null_value(input) {
                    for field in fields {
                        field.parse_string_and_write_bytes(
                            options.null_member(),
                            options,
                            delimiter_index,
                            dictionary,
                            sink,
                        )?;
                    }
                    return Ok(());
                }

                let fragments: Vec<&str> = input.split(options.delimiter(delimiter_index)).collect();
                if fragments.len() > fields.len() {
                    return Err(CodecError::Parsing {
                        column: self.name().to_string(),
                        message: format!(
                            "{} values for a struct of {} fields",
                            fragments.len(),
                            fields.len()
                        ),
                    });
                }
                let next = options.next_delimiter_index(delimiter_index);
                for (i, field) in fields.iter().enumerate() {
                    let fragment = fragments.get(i).copied().unwrap_or(options.null_member());
                    field.parse_string_and_write_bytes(fragment, options, next, dictionary, sink)?;
                }
                Ok(())
            }
            TypeKind::Primitive { .. } => {
                let key = if options.is_null_value(input) {
                    NULL_SURROGATE_KEY
                } else {
                    dictionary.generate_surrogate_key(input, self)?
                };
                sink.write_all(&key.to_be_bytes())?;
                Ok(())
            }
        }
    }
}
