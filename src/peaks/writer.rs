//! Peak list export
//!
//! Two formats are written: a tab-separated XPK2-style text file for other
//! NMR tools, and a Parquet table with one row per peak for analysis.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;

use super::error::PeakPickError;
use super::types::PeakList;

/// Zstd level for peak tables
const PEAK_TABLE_ZSTD_LEVEL: i32 = 3;

/// Write `list` as tab-separated XPK2-style text
///
/// The file holds three blocks: list identity, one line per dimension, and
/// one line per peak with `<label>.P` (ppm), `<label>.W` (width) and
/// `<label>.pt` (point) columns per dimension.
pub fn write_xpk2<W: Write>(list: &PeakList, writer: W) -> Result<(), PeakPickError> {
    let mut out = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(writer);

    out.write_record(["peaklist", "dataset", "ndim"])?;
    out.write_record([
        list.name.clone(),
        list.dataset_name.clone(),
        list.n_dim().to_string(),
    ])?;

    out.write_record(["label", "sf", "sw", "size"])?;
    for dim in &list.dims {
        out.write_record([
            dim.label.clone(),
            dim.sf.to_string(),
            dim.sw.to_string(),
            dim.size.to_string(),
        ])?;
    }

    let mut columns = vec!["id".to_string()];
    for dim in &list.dims {
        columns.push(format!("{}.P", dim.label));
        columns.push(format!("{}.W", dim.label));
        columns.push(format!("{}.pt", dim.label));
    }
    columns.push("volume".to_string());
    columns.push("intensity".to_string());
    out.write_record(&columns)?;

    for peak in &list.peaks {
        let mut row = vec![peak.id.to_string()];
        for dim in &peak.dims {
            row.push(format!("{:.5}", dim.ppm));
            row.push(format!("{:.5}", dim.width_ppm));
            row.push(format!("{:.3}", dim.point));
        }
        row.push(peak.volume.to_string());
        row.push(peak.intensity.to_string());
        out.write_record(&row)?;
    }

    out.flush()?;
    Ok(())
}

/// Write `list` as XPK2 text to `path`
pub fn write_xpk2_file<P: AsRef<Path>>(list: &PeakList, path: P) -> Result<(), PeakPickError> {
    let file = File::create(path.as_ref())?;
    write_xpk2(list, BufWriter::new(file))?;
    info!(
        "Wrote {} peaks of {} to {}",
        list.len(),
        list.name,
        path.as_ref().display()
    );
    Ok(())
}

/// Arrow schema of a peak table for `n_dim` dimensions
///
/// Columns: `id`, `intensity`, `volume`, then `ppm_<d>`, `width_<d>` and
/// `point_<d>` for each dimension `d`.
pub fn peak_table_schema(n_dim: usize) -> Schema {
    let mut fields = vec![
        Field::new("id", DataType::UInt64, false),
        Field::new("intensity", DataType::Float64, false),
        Field::new("volume", DataType::Float64, false),
    ];
    for d in 0..n_dim {
        fields.push(Field::new(format!("ppm_{}", d), DataType::Float64, false));
        fields.push(Field::new(format!("width_{}", d), DataType::Float64, false));
        fields.push(Field::new(format!("point_{}", d), DataType::Float64, false));
    }
    Schema::new(fields)
}

/// Build a record batch holding every peak of `list`
pub fn peak_table(list: &PeakList) -> Result<RecordBatch, PeakPickError> {
    let n_dim = list.n_dim();
    if let Some(peak) = list.peaks.iter().find(|p| p.dims.len() != n_dim) {
        return Err(PeakPickError::InvalidOption(format!(
            "peak {} has {} dimensions, list {} has {}",
            peak.id,
            peak.dims.len(),
            list.name,
            n_dim
        )));
    }

    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(
            list.peaks.iter().map(|p| p.id as u64),
        )),
        Arc::new(Float64Array::from_iter_values(
            list.peaks.iter().map(|p| p.intensity),
        )),
        Arc::new(Float64Array::from_iter_values(
            list.peaks.iter().map(|p| p.volume),
        )),
    ];
    for d in 0..n_dim {
        arrays.push(Arc::new(Float64Array::from_iter_values(
            list.peaks.iter().map(|p| p.dims[d].ppm),
        )));
        arrays.push(Arc::new(Float64Array::from_iter_values(
            list.peaks.iter().map(|p| p.dims[d].width_ppm),
        )));
        arrays.push(Arc::new(Float64Array::from_iter_values(
            list.peaks.iter().map(|p| p.dims[d].point),
        )));
    }

    Ok(RecordBatch::try_new(
        Arc::new(peak_table_schema(n_dim)),
        arrays,
    )?)
}

/// Write `list` as a Parquet table
///
/// List name, dataset name and the axis descriptions (JSON) are stored as
/// file key-value metadata.
pub fn write_parquet<W: Write + Send>(list: &PeakList, writer: W) -> Result<(), PeakPickError> {
    let batch = peak_table(list)?;
    let dims_json = serde_json::to_string(&list.dims).map_err(|e| {
        PeakPickError::InvalidOption(format!("cannot encode axes of {}: {}", list.name, e))
    })?;
    let metadata = vec![
        KeyValue {
            key: "peak_list.name".to_string(),
            value: Some(list.name.clone()),
        },
        KeyValue {
            key: "peak_list.dataset".to_string(),
            value: Some(list.dataset_name.clone()),
        },
        KeyValue {
            key: "peak_list.dims".to_string(),
            value: Some(dims_json),
        },
    ];

    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(
            ZstdLevel::try_new(PEAK_TABLE_ZSTD_LEVEL).unwrap_or_default(),
        ))
        .set_key_value_metadata(Some(metadata))
        .build();

    let mut arrow_writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))?;
    arrow_writer.write(&batch)?;
    arrow_writer.close()?;
    Ok(())
}

/// Write `list` as a Parquet table to `path`
pub fn write_parquet_file<P: AsRef<Path>>(list: &PeakList, path: P) -> Result<(), PeakPickError> {
    let file = File::create(path.as_ref())?;
    write_parquet(list, file)?;
    info!(
        "Wrote {} peaks of {} to {}",
        list.len(),
        list.name,
        path.as_ref().display()
    );
    Ok(())
}
