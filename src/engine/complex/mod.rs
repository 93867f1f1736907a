pub mod bit_packer;
mod byte_reader;
pub mod codec_options;
pub mod columnar_state;
pub mod complex_column_codec;
pub mod dictionary;
pub mod encoder;
pub mod generic_type;
pub mod key_generator;
pub mod metadata;
pub mod schema_builder;
pub mod transposer;

pub use codec_options::{CodecOptions, DEFAULT_NULL_MEMBER};
pub use columnar_state::{ColumnarBlocks, ColumnarState};
pub use complex_column_codec::ComplexColumnCodec;
pub use dictionary::{InMemoryDictionary, NULL_SURROGATE_KEY, SurrogateKeyGenerator};
pub use generic_type::{GenericType, TypeKind};
pub use key_generator::KeyGenerator;
pub use metadata::ComplexColumnMetadata;
pub use schema_builder::{ComplexSchemaBuilder, TypeSpec, parse_type_spec};
pub use transposer::{ColumnarTransposer, HEADER_BLOCK_LEN};

#[cfg(test)]
mod bit_packer_test;
#[cfg(test)]
mod schema_builder_test;
