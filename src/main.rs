use clap::Parser;
use columnar_ingest::engine::complex::{
    CodecOptions, ComplexColumnCodec, ComplexSchemaBuilder, InMemoryDictionary,
};
use columnar_ingest::engine::pipeline::{
    ColumnarWriter, ComplexConverter, DataField, DataType, FieldValue, InputStep, LoadRuntime, Row,
};
use columnar_ingest::logging;
use columnar_ingest::shared::config::CONFIG;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "columnar_ingest")]
#[command(about = "Load nested column values into columnar blocks", long_about = None)]
struct Args {
    /// Column type, e.g. "array<struct<a:string,b:int>>"
    #[arg(short, long)]
    schema: String,

    /// File with one column value per line
    #[arg(short, long)]
    input: PathBuf,

    /// Column name
    #[arg(short, long, default_value = "col")]
    column: String,

    /// Overrides load.partitions
    #[arg(long)]
    partitions: Option<usize>,

    /// Overrides load.batch_size
    #[arg(long)]
    batch_size: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init()?;

    let load = &CONFIG.load;
    let options = CodecOptions::from_config(load)?;
    let schema = Arc::new(ComplexSchemaBuilder::new(&args.column).build(&args.schema)?);
    let codec = ComplexColumnCodec::new(Arc::clone(&schema), options.clone())?;

    let text = fs::read_to_string(&args.input)?;
    let lines: Vec<&str> = text.lines().collect();
    info!(rows = lines.len(), input = ?args.input, "Read input");

    // Dictionary pass first so every key width is known before packing.
    let dictionary = Arc::new(InMemoryDictionary::new());
    for line in &lines {
        codec.encode(line, dictionary.as_ref())?;
    }
    let generators = codec.key_generators(dictionary.as_ref());

    let fields = vec![DataField::new(
        &args.column,
        DataType::Complex(Arc::clone(&schema)),
    )];
    let rows: Vec<Row> = lines
        .iter()
        .map(|line| Row::new(vec![FieldValue::from(*line)]))
        .collect();
    let input = InputStep::from_rows(
        fields,
        rows,
        args.batch_size.unwrap_or(load.batch_size),
        args.partitions.unwrap_or(load.partitions),
    );
    let converter = ComplexConverter::new(options, dictionary.clone(), generators.clone())
        .into_step(Box::new(input));

    let writer = ColumnarWriter::new();
    let summary = LoadRuntime::new(Box::new(converter)).run(&writer)?;
    let metadata = codec.column_metadata(dictionary.as_ref(), &generators)?;

    println!(
        "loaded {} rows in {} batches over {} partitions",
        summary.total_rows(),
        summary.total_batches(),
        summary.partitions.len()
    );
    let outputs = writer.outputs();
    for index in schema.output_array_index()..=schema.max_output_array_index() {
        let (blocks, bytes) = outputs
            .iter()
            .filter_map(|o| o.complex_column(&args.column))
            .fold((0, 0), |(blocks, bytes), c| {
                (blocks + c.column(index).len(), bytes + c.byte_len(index))
            });
        let meta = index - schema.output_array_index();
        println!(
            "column {}: {} blocks, {} bytes, key size {}, cardinality {}",
            index, blocks, bytes, metadata.block_key_size[meta], metadata.cardinality[meta]
        );
    }
    Ok(())
}
