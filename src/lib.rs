//! Complex-type encoding and streaming load pipeline for a columnar store.
//!
//! Nested column values (arrays, structs) arrive as delimiter-separated
//! text. [`engine::complex`] turns them into surrogate-key streams, repacks
//! the keys to fixed widths and transposes rows into per-level output
//! columns. [`engine::pipeline`] moves row batches through a chain of steps,
//! one lazy sequence per partition.

pub mod engine;
pub mod logging;
pub mod shared;

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
