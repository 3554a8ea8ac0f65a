//! Integration tests for dscript
//!
//! These tests drive the scripting session end to end: dataset creation,
//! combination, extraction, peak picking and export.

use dscript::prelude::*;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::{self, File};
use tempfile::tempdir;

/// Calibrated 2-D dataset with a single peak of `height` at `(px, py)`
fn spectrum(
    ctx: &mut ScriptContext,
    name: &str,
    template: Option<&Dataset>,
    px: usize,
    py: usize,
    height: f64,
) -> Dataset {
    let mut dataset = ctx.create(name, &[64, 16], template, name).unwrap();
    if template.is_none() {
        let h1 = dataset.dim_header_mut(0).unwrap();
        h1.label = "H1".to_string();
        h1.sf = 600.0;
        h1.sw = 6400.0;
        h1.ref_value = 11.0;
        let n15 = dataset.dim_header_mut(1).unwrap();
        n15.label = "N15".to_string();
        n15.sf = 60.0;
        n15.sw = 1920.0;
        n15.ref_value = 130.0;
        dataset.write_header().unwrap();
    }
    for y in 0..16 {
        let values = (0..64)
            .map(|x| {
                let r2 = (x as f64 - px as f64).powi(2) + 4.0 * (y as f64 - py as f64).powi(2);
                height * (-r2 / 4.0).exp()
            })
            .collect();
        let mut row = DataVector::from_real(values);
        row.set_pt(&[y], 0);
        dataset.write_vector(&row).unwrap();
    }
    dataset
}

/// Create, combine and pick through one session
#[test]
fn test_combine_then_pick_pipeline() {
    let dir = tempdir().unwrap();
    let mut ctx = ScriptContext::new(ScriptConfig::with_base_dir(dir.path()));

    let first = spectrum(&mut ctx, "first.nv", None, 20, 5, 1000.0);
    let second = spectrum(&mut ctx, "second.nv", Some(&first), 40, 10, 600.0);
    assert_eq!(second.dim_header(0).unwrap().label, "H1");
    assert_eq!(second.dim_header(1).unwrap().sf, 60.0);
    ctx.close(second).unwrap();

    // second by path, first by handle
    let inputs: Vec<DatasetSource> = vec![(&first).into(), "second.nv".into()];
    let stats = ctx
        .combine_n(
            |vs: &[DataVector]| vs[0].zip_with(&vs[1], |a, b| a + b).unwrap(),
            "both.nv",
            &inputs,
        )
        .unwrap();
    assert_eq!(stats.vectors_written, 16);

    let both = ctx.open("both.nv", false).unwrap();
    assert_eq!(both.dim_header(0).unwrap().label, "H1");

    let all = ctx.pick(&both, PickOptions::default().level(100.0)).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.name, "both");
    assert_eq!(all.dims[0].label, "H1");

    // 0.1667 ppm per H1 point: point 20 sits at 7.667 ppm, point 40 at 4.333
    let near = ctx
        .pick(
            &both,
            PickOptions::default()
                .level(100.0)
                .list_name("near")
                .limit("x", 8.5, 7.0),
        )
        .unwrap();
    assert_eq!(near.len(), 1);
    assert!((near.peaks[0].dims[0].ppm - (11.0 - 20.0 / 6.0)).abs() < 1e-6);
    assert!((near.peaks[0].dims[1].ppm - (130.0 - 5.0 * 2.0)).abs() < 1e-6);
    assert_eq!(ctx.peak_list_names(), vec!["both".to_string(), "near".to_string()]);

    let rejected = ctx.pick(&both, PickOptions::default().limit("q", 1.0, 2.0));
    assert!(rejected.unwrap_err().is_invalid_argument());
}

/// Extracted vectors carry the source calibration
#[test]
fn test_extract_keeps_axis() {
    let dir = tempdir().unwrap();
    let mut ctx = ScriptContext::new(ScriptConfig::with_base_dir(dir.path()));
    let spec = spectrum(&mut ctx, "spec.nv", None, 20, 5, 1000.0);

    let column = ctx.extract(&spec, 1, &[20]).unwrap();
    assert_eq!(column.name(), "spec_d2_21");
    assert_eq!(column.dim_header(0).unwrap().label, "N15");
    assert_eq!(column.size(0).unwrap(), 16);

    let mut vector = ctx.get_vector(&column, 0).unwrap();
    column.read_vector(&mut vector).unwrap();
    let max = vector
        .real()
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i);
    assert_eq!(max, Some(5));
}

/// Peak lists round-trip through both export formats
#[test]
fn test_peak_list_exports() {
    let dir = tempdir().unwrap();
    let mut ctx = ScriptContext::new(ScriptConfig::with_base_dir(dir.path()));
    let spec = spectrum(&mut ctx, "spec.nv", None, 30, 8, 500.0);
    let list = ctx.pick(&spec, PickOptions::default().level(10.0)).unwrap();
    assert_eq!(list.len(), 1);

    let xpk2 = dir.path().join("spec.xpk2");
    write_xpk2_file(&list, &xpk2).unwrap();
    let text = fs::read_to_string(&xpk2).unwrap();
    assert!(text.contains("H1.P\tH1.W\tH1.pt\tN15.P"));

    let parquet = dir.path().join("spec.parquet");
    write_parquet_file(&list, &parquet).unwrap();
    let reader = SerializedFileReader::new(File::open(&parquet).unwrap()).unwrap();
    let metadata = reader.metadata().file_metadata();
    assert_eq!(metadata.num_rows(), 1);
    assert_eq!(metadata.schema_descr().num_columns(), 9);
}

/// Pipe export is sized by the dataset
#[test]
fn test_pipe_export_size() {
    let dir = tempdir().unwrap();
    let mut ctx = ScriptContext::new(ScriptConfig::with_base_dir(dir.path()));
    let spec = spectrum(&mut ctx, "spec.nv", None, 30, 8, 500.0);

    let stats = ctx.to_pipe(&spec, "spec.ft2").unwrap();
    assert_eq!(stats.vectors_written, 16);
    let len = fs::metadata(dir.path().join("spec.ft2")).unwrap().len();
    assert_eq!(len, (512 + 64 * 16) * 4);
}
