use crate::engine::complex::GenericType;

/// Mutable per-run counters for one schema tree, keyed by output array index.
/// Only valid for trees that pass [`GenericType::check_output_layout`].
///
/// Each partition owns its own state so a shared tree can be transposed
/// concurrently.
#[derive(Debug, Clone, Default)]
pub struct ColumnarState {
    data_counters: Vec<u32>,
    key_sizes: Vec<usize>,
}

impl ColumnarState {
    pub fn for_schema(schema: &GenericType) -> Self {
        let slots = schema.max_output_array_index() + 1;
        Self {
            data_counters: vec![0; slots],
            key_sizes: vec![0; slots],
        }
    }

    /// Elements produced so far at `node`'s output column.
    pub fn data_counter(&self, node: &GenericType) -> u32 {
        self.data_counters
            .get(node.output_array_index())
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn increment(&mut self, node: &GenericType) {
        let idx = node.output_array_index();
        if idx >= self.data_counters.len() {
            self.data_counters.resize(idx + 1, 0);
        }
        self.data_counters[idx] += 1;
    }

    /// Key width most recently read for leaf `node`.
    pub fn key_size(&self, node: &GenericType) -> usize {
        self.key_sizes
            .get(node.output_array_index())
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn set_key_size(&mut self, node: &GenericType, size: usize) {
        let idx = node.output_array_index();
        if idx >= self.key_sizes.len() {
            self.key_sizes.resize(idx + 1, 0);
        }
        self.key_sizes[idx] = size;
    }
}

/// Per-output-column byte blocks produced by transposition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnarBlocks {
    columns: Vec<Vec<Vec<u8>>>,
}

impl ColumnarBlocks {
    pub fn new(column_count: usize) -> Self {
        Self {
            columns: vec![Vec::new(); column_count],
        }
    }

    pub fn for_schema(schema: &GenericType) -> Self {
        Self::new(schema.max_output_array_index() + 1)
    }

    pub fn push(&mut self, column: usize, block: Vec<u8>) {
        if column >= self.columns.len() {
            self.columns.resize(column + 1, Vec::new());
        }
        self.columns[column].push(block);
    }

    pub fn column(&self, index: usize) -> &[Vec<u8>] {
        self.columns.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every block of one column joined into a single buffer.
    pub fn concatenated(&self, index: usize) -> Vec<u8> {
        self.column(index).concat()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn byte_len(&self, index: usize) -> usize {
        self.column(index).iter().map(Vec::len).sum()
    }
}
