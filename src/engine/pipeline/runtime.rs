use crate::engine::errors::StageExecutionError;
use crate::engine::pipeline::step::{DataLoadStep, RowBatchIter};
use crate::engine::pipeline::writer::BatchWriter;
use crate::engine::pipeline::DataField;
use rayon::prelude::*;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionSummary {
    pub partition: usize,
    pub batches: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub partitions: Vec<PartitionSummary>,
}

impl LoadSummary {
    pub fn total_rows(&self) -> usize {
        self.partitions.iter().map(|p| p.rows).sum()
    }

    pub fn total_batches(&self) -> usize {
        self.partitions.iter().map(|p| p.batches).sum()
    }
}

/// Runs a chain of steps into a terminal writer, one worker per partition.
pub struct LoadRuntime {
    root: Box<dyn DataLoadStep>,
}

impl LoadRuntime {
    /// `root` is the last step of the chain; it owns its upstream steps.
    pub fn new(root: Box<dyn DataLoadStep>) -> Self {
        Self { root }
    }

    pub fn output(&self) -> &[DataField] {
        self.root.output()
    }

    /// Initializes, drains every partition into `writer`, finishes, and
    /// always closes the chain.
    pub fn run(&mut self, writer: &dyn BatchWriter) -> Result<LoadSummary, StageExecutionError> {
        let started = Instant::now();
        let result = self.run_inner(writer);
        self.root.close();

        match &result {
            Ok(summary) => info!(
                target: "ingest::pipeline",
                rows = summary.total_rows(),
                batches = summary.total_batches(),
                partitions = summary.partitions.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Load complete"
            ),
            Err(e) => e.log_error(),
        }
        result
    }

    fn run_inner(&mut self, writer: &dyn BatchWriter) -> Result<LoadSummary, StageExecutionError> {
        self.root.initialize()?;
        let iters = self.root.execute()?;
        let fields = self.root.output().to_vec();

        let results: Vec<Result<PartitionSummary, StageExecutionError>> = iters
            .into_par_iter()
            .enumerate()
            .map(|(partition, iter)| {
                catch_unwind(AssertUnwindSafe(|| {
                    drain_partition(partition, iter, writer, &fields)
                }))
                .unwrap_or(Err(StageExecutionError::Panicked { partition }))
            })
            .collect();

        let mut partitions = Vec::with_capacity(results.len());
        let mut first_error = None;
        for result in results {
            match result {
                Ok(summary) => partitions.push(summary),
                Err(e) => {
                    e.log_error();
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        self.root.finish()?;
        Ok(LoadSummary { partitions })
    }
}

fn drain_partition(
    partition: usize,
    iter: RowBatchIter,
    writer: &dyn BatchWriter,
    fields: &[DataField],
) -> Result<PartitionSummary, StageExecutionError> {
    let mut sink = writer.open_partition(partition, fields)?;
    let mut summary = PartitionSummary {
        partition,
        ..Default::default()
    };
    for batch in iter {
        let batch = batch?;
        sink.write_batch(&batch)?;
        summary.batches += 1;
        summary.rows += batch.len();
    }
    sink.close()?;
    debug!(
        target: "ingest::pipeline",
        partition,
        batches = summary.batches,
        rows = summary.rows,
        "Partition drained"
    );
    Ok(summary)
}
