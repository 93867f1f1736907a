pub mod codec_options_factory;
pub mod generic_type_factory;
pub mod row_batch_factory;

pub use codec_options_factory::CodecOptionsFactory;
pub use generic_type_factory::GenericTypeFactory;
pub use row_batch_factory::RowBatchFactory;

#[cfg(test)]
mod codec_options_factory_test;
#[cfg(test)]
mod generic_type_factory_test;
#[cfg(test)]
mod row_batch_factory_test;
