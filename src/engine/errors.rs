use std::io;
use thiserror::Error;
use tracing::{debug, error};

/// Errors raised while assembling a complex-type schema tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaConstructionError {
    #[error("No node accepts '{child}' under parent '{parent}' (searched from '{at}')")]
    NoMatchingParent {
        child: String,
        parent: String,
        at: String,
    },

    #[error("Array '{array}' already has an element type, cannot attach '{child}'")]
    ElementTypeAlreadySet { array: String, child: String },

    #[error("'{parent}' already has a child named '{child}'")]
    DuplicateChild { parent: String, child: String },

    #[error("Primitive column '{leaf}' cannot own child '{child}'")]
    LeafCannotHaveChildren { leaf: String, child: String },

    #[error("Array '{0}' has no element type")]
    MissingElementType(String),

    #[error("Struct '{0}' has no fields")]
    EmptyStruct(String),

    #[error("Invalid complex type definition: {0}")]
    InvalidTypeString(String),

    #[error("Column '{node}' has output index {found}, expected {expected}; flatten the schema first")]
    OutputIndexMismatch {
        node: String,
        expected: usize,
        found: usize,
    },
}

/// Errors raised by the nested-type codec protocols.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaConstructionError),

    #[error("Parsing failed for column '{column}': {message}")]
    Parsing { column: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unexpected end of buffer in column '{column}': needed {needed} bytes, {remaining} left")]
    UnexpectedEof {
        column: String,
        needed: usize,
        remaining: usize,
    },

    #[error("No key generator for column '{column}' at surrogate index {surrogate_index}")]
    MissingKeyGenerator {
        column: String,
        surrogate_index: usize,
    },

    #[error("No metadata for column '{column}' at surrogate index {surrogate_index}")]
    MissingColumnMetadata {
        column: String,
        surrogate_index: usize,
    },

    #[error("Surrogate key {key} does not fit in {key_size} bytes")]
    KeyOverflow { key: u32, key_size: usize },

    #[error("Complex delimiter list is empty")]
    NoDelimiters,

    #[error("Null member sentinel is empty")]
    EmptyNullMember,
}

/// Errors surfaced by pipeline steps and the load runtime.
#[derive(Debug, Error)]
pub enum StageExecutionError {
    #[error("Step '{0}' used before initialize()")]
    NotInitialized(String),

    #[error("Step '{step}' cannot {op} while {state}")]
    InvalidState {
        step: String,
        state: String,
        op: &'static str,
    },

    #[error("Step '{step}' failed on column '{column}': {source}")]
    Codec {
        step: String,
        column: String,
        #[source]
        source: CodecError,
    },

    #[error("Step '{step}' failed: {message}")]
    Processing { step: String, message: String },

    #[error("Writer failed on partition {partition}: {message}")]
    Writer { partition: usize, message: String },

    #[error("Partition {partition} worker panicked")]
    Panicked { partition: usize },
}

impl StageExecutionError {
    pub fn log_error(&self) {
        match self {
            StageExecutionError::NotInitialized(step) => {
                error!(target: "ingest::pipeline", step = %step, "Step used before initialize");
            }
            StageExecutionError::InvalidState { step, state, op } => {
                error!(target: "ingest::pipeline", step = %step, state = %state, op, "Invalid step state");
            }
            StageExecutionError::Codec {
                step,
                column,
                source,
            } => {
                error!(target: "ingest::pipeline", step = %step, column = %column, "Codec failure: {}", source);
                debug!(target: "ingest::pipeline", "Codec failure details: {:?}", source);
            }
            StageExecutionError::Processing { step, message } => {
                error!(target: "ingest::pipeline", step = %step, "Processing failed: {}", message);
            }
            StageExecutionError::Writer { partition, message } => {
                error!(target: "ingest::writer", partition, "Writer failed: {}", message);
            }
            StageExecutionError::Panicked { partition } => {
                error!(target: "ingest::pipeline", partition, "Partition worker panicked");
            }
        }
    }
}
