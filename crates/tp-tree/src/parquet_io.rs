//! Parquet read/write for event trees.
//!
//! A tree file is a plain Parquet table. Numeric and boolean columns are
//! widened to `Float64` on read; other column types are skipped.
//!
//! ## Parquet key-value metadata
//!
//! | Key                   | Value                                 |
//! |-----------------------|---------------------------------------|
//! | `treeplot.tree_name`  | tree name stored in the file          |
//!
//! Files without the key hold a single anonymous tree, accepted under any
//! requested name.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::dataset::Dataset;
use crate::error::{Result, TreeError};

/// Parquet metadata key holding the tree name.
pub const META_KEY_TREE_NAME: &str = "treeplot.tree_name";

fn is_numeric(dt: &DataType) -> bool {
    dt.is_numeric() || matches!(dt, DataType::Boolean)
}

/// Read the tree `tree_name` from a Parquet file.
pub fn read_tree_parquet(path: &Path, tree_name: &str) -> Result<Dataset> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();

    if let Some(found) = schema.metadata().get(META_KEY_TREE_NAME)
        && found != tree_name
    {
        return Err(TreeError::TreeNotFound {
            requested: tree_name.to_string(),
            found: found.clone(),
        });
    }

    let batches = builder.build()?.collect::<std::result::Result<Vec<_>, _>>()?;
    let ds = batches_to_dataset(tree_name, &schema, &batches)?;
    log::debug!(
        "read tree '{}' from {}: {} entries, {} columns",
        tree_name,
        path.display(),
        ds.entries(),
        ds.column_names().count()
    );
    Ok(ds)
}

fn batches_to_dataset(tree_name: &str, schema: &Schema, batches: &[RecordBatch]) -> Result<Dataset> {
    let mut ds = Dataset::new(tree_name);
    for (idx, field) in schema.fields().iter().enumerate() {
        if !is_numeric(field.data_type()) {
            log::debug!("skipping non-numeric column: {} ({})", field.name(), field.data_type());
            continue;
        }
        let mut values = Vec::new();
        for batch in batches {
            let col = batch.column(idx);
            let widened = cast(col, &DataType::Float64)?;
            let f = widened.as_primitive::<Float64Type>();
            values.extend((0..f.len()).map(|i| if f.is_null(i) { f64::NAN } else { f.value(i) }));
        }
        ds.push_column(field.name().clone(), values)?;
    }
    Ok(ds)
}

/// Write a tree's own columns (friends excluded) to a Parquet file.
pub fn write_tree_parquet(dataset: &Dataset, path: &Path) -> Result<()> {
    let names: Vec<&str> = dataset.column_names().collect();
    let fields: Vec<Field> =
        names.iter().map(|n| Field::new(*n, DataType::Float64, false)).collect();
    let metadata = HashMap::from([(META_KEY_TREE_NAME.to_string(), dataset.name().to_string())]);
    let schema = Arc::new(Schema::new(fields).with_metadata(metadata));

    let arrays: Vec<ArrayRef> = names
        .iter()
        .map(|n| {
            let col = dataset.column(n).ok_or_else(|| TreeError::ColumnNotFound(n.to_string()))?;
            Ok(Arc::new(Float64Array::from(col.to_vec())) as ArrayRef)
        })
        .collect::<Result<_>>()?;

    let batch = if arrays.is_empty() {
        RecordBatch::new_empty(schema.clone())
    } else {
        RecordBatch::try_new(schema.clone(), arrays)?
    };

    let props = WriterProperties::builder().set_compression(Compression::SNAPPY).build();
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    log::debug!("wrote tree '{}' ({} entries) to {}", dataset.name(), dataset.entries(), path.display());
    Ok(())
}
