use crate::engine::complex::{ComplexSchemaBuilder, GenericType};
use std::sync::Arc;

pub struct GenericTypeFactory {
    column: String,
    type_str: String,
    first_surrogate_index: usize,
    output_base: usize,
}

impl GenericTypeFactory {
    pub fn new() -> Self {
        Self {
            column: "col".into(),
            type_str: "array<array<string>>".into(),
            first_surrogate_index: 0,
            output_base: 0,
        }
    }

    pub fn with_column(mut self, column: &str) -> Self {
        self.column = column.into();
        self
    }

    pub fn with_type(mut self, type_str: &str) -> Self {
        self.type_str = type_str.into();
        self
    }

    pub fn with_first_surrogate_index(mut self, index: usize) -> Self {
        self.first_surrogate_index = index;
        self
    }

    pub fn with_output_base(mut self, base: usize) -> Self {
        self.output_base = base;
        self
    }

    pub fn create(self) -> GenericType {
        ComplexSchemaBuilder::new(&self.column)
            .with_first_surrogate_index(self.first_surrogate_index)
            .with_output_base(self.output_base)
            .build(&self.type_str)
            .expect("valid complex type")
    }

    pub fn create_shared(self) -> Arc<GenericType> {
        Arc::new(self.create())
    }
}
