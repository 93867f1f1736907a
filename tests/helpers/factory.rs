pub use super::factories::{CodecOptionsFactory, GenericTypeFactory, RowBatchFactory};

pub struct Factory;

impl Factory {
    pub fn generic_type() -> GenericTypeFactory {
        GenericTypeFactory::new()
    }

    pub fn codec_options() -> CodecOptionsFactory {
        CodecOptionsFactory::new()
    }

    pub fn row_batch() -> RowBatchFactory {
        RowBatchFactory::new()
    }
}
