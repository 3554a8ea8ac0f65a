use super::*;
use std::collections::HashSet;
use std::fs;
use tempfile::tempdir;

fn ramp(n: usize, offset: f64) -> Vec<f64> {
    (0..n).map(|i| offset + i as f64).collect()
}

// ==================== Create / Open ====================

#[test]
fn test_create_and_reopen() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("test.nv");

    let dataset = Dataset::create(&path, "test", &[8, 4, 3], false)?;
    assert_eq!(dataset.name(), "test.nv");
    assert_eq!(dataset.n_dim(), 3);
    assert_eq!(dataset.sizes(), vec![8, 4, 3]);
    assert!(dataset.is_writable());
    dataset.close()?;

    let reopened = Dataset::open(&path, false)?;
    assert_eq!(reopened.sizes(), vec![8, 4, 3]);
    assert_eq!(reopened.header().title, "test");
    assert!(!reopened.is_writable());

    Ok(())
}

#[test]
fn test_create_refuses_existing_without_overwrite() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("exists.nv");

    Dataset::create(&path, "", &[4], false)?.close()?;
    let result = Dataset::create(&path, "", &[4], false);
    assert!(matches!(result, Err(DatasetError::InvalidArgument(_))));

    Dataset::create(&path, "", &[6], true)?.close()?;
    assert_eq!(Dataset::open(&path, false)?.sizes(), vec![6]);

    Ok(())
}

#[test]
fn test_create_rejects_bad_dimensionality() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.nv");

    assert!(Dataset::create(&path, "", &[], false).is_err());
    assert!(Dataset::create(&path, "", &[2; MAX_DIMS + 1], false).is_err());
}

#[test]
fn test_open_rejects_foreign_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreign.nv");
    fs::write(&path, b"not a dataset at all").unwrap();

    let result = Dataset::open(&path, false);
    assert!(matches!(result, Err(DatasetError::InvalidFormat(_))));
}

#[test]
fn test_open_rejects_truncated_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("trunc.nv");
    Dataset::create(&path, "", &[64, 64], false)?.close()?;

    let len = fs::metadata(&path)?.len();
    let file = fs::OpenOptions::new().write(true).open(&path)?;
    file.set_len(len - 100)?;

    let result = Dataset::open(&path, false);
    assert!(matches!(result, Err(DatasetError::InvalidFormat(_))));
    Ok(())
}

#[test]
fn test_open_missing_file_is_io_error() {
    let result = Dataset::open("/nonexistent/dir/missing.nv", false);
    assert!(matches!(result, Err(DatasetError::IoError(_))));
}

// ==================== Vector I/O ====================

#[test]
fn test_write_read_along_dim0() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("dim0.nv");
    let mut dataset = Dataset::create(&path, "", &[5, 3], false)?;

    for row in 0..3 {
        let mut vector = DataVector::from_real(ramp(5, row as f64 * 10.0));
        vector.set_pt(&[row], 0);
        dataset.write_vector(&vector)?;
    }
    dataset.close()?;

    let dataset = Dataset::open(&path, false)?;
    let mut vector = DataVector::new(0, false);
    dataset.read_vector_at(&mut vector, &[2], 0)?;
    assert_eq!(vector.real(), &[20.0, 21.0, 22.0, 23.0, 24.0]);
    assert_eq!(vector.location().coords, vec![2]);

    Ok(())
}

#[test]
fn test_read_along_dim1_sees_columns() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("dim1.nv");
    let mut dataset = Dataset::create(&path, "", &[4, 3], false)?;

    for row in 0..3 {
        let mut vector = DataVector::from_real(ramp(4, row as f64 * 100.0));
        vector.set_pt(&[row], 0);
        dataset.write_vector(&vector)?;
    }

    let mut column = DataVector::new(0, false);
    dataset.read_vector_at(&mut column, &[1], 1)?;
    assert_eq!(column.real(), &[1.0, 101.0, 201.0]);

    // Writing along dim 1 lands in the rows
    let mut replacement = DataVector::from_real(vec![-1.0, -2.0, -3.0]);
    replacement.set_pt(&[3], 1);
    dataset.write_vector(&replacement)?;

    let mut row = DataVector::new(0, false);
    dataset.read_vector_at(&mut row, &[2], 0)?;
    assert_eq!(row.real(), &[200.0, 201.0, 202.0, -3.0]);

    Ok(())
}

#[test]
fn test_complex_dimension_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("complex.nv");

    let mut header = DatasetHeader::new("", &[4, 2])?;
    header.dims[0].complex = true;
    let mut dataset = Dataset::create_with_header(&path, header, false)?;
    assert_eq!(dataset.stored_size(0)?, 8);

    let mut vector = DataVector::from_complex(vec![1.0, 2.0, 3.0, 4.0], vec![0.5, 0.25, 0.0, -1.0])?;
    vector.set_pt(&[1], 0);
    dataset.write_vector(&vector)?;
    dataset.close()?;

    let dataset = Dataset::open(&path, false)?;
    let mut read = DataVector::new(0, false);
    dataset.read_vector_at(&mut read, &[1], 0)?;
    assert!(read.is_complex());
    assert_eq!(read.real(), vector.real());
    assert_eq!(read.imag(), vector.imag());

    // Along dim 1 the complex dimension contributes interleaved rows
    assert_eq!(dataset.indexer(1)?.len(), 8);
    dataset.read_vector_at(&mut read, &[1], 1)?;
    assert_eq!(read.real(), &[0.0, 0.5]);

    Ok(())
}

#[test]
fn test_write_vector_checks_shape() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut dataset = Dataset::create(dir.path().join("shape.nv"), "", &[4, 2], false)?;

    let mut short = DataVector::from_real(vec![1.0; 3]);
    short.set_pt(&[0], 0);
    assert!(matches!(
        dataset.write_vector(&short),
        Err(DatasetError::VectorMismatch(_))
    ));

    let mut out_of_range = DataVector::from_real(vec![1.0; 4]);
    out_of_range.set_pt(&[2], 0);
    assert!(matches!(
        dataset.write_vector(&out_of_range),
        Err(DatasetError::IndexOutOfRange { dim: 1, index: 2, extent: 2 })
    ));

    let mut bad_dim = DataVector::from_real(vec![1.0; 4]);
    bad_dim.set_pt(&[0], 5);
    assert!(matches!(
        dataset.write_vector(&bad_dim),
        Err(DatasetError::DimensionOutOfRange { dim: 5, n_dim: 2 })
    ));

    Ok(())
}

#[test]
fn test_read_only_rejects_writes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("ro.nv");
    Dataset::create(&path, "", &[4], false)?.close()?;

    let mut dataset = Dataset::open(&path, false)?;
    let vector = DataVector::from_real(vec![1.0; 4]);
    assert!(matches!(
        dataset.write_vector(&vector),
        Err(DatasetError::ReadOnly(_))
    ));
    assert!(matches!(dataset.write_header(), Err(DatasetError::ReadOnly(_))));
    Ok(())
}

#[test]
fn test_vectors_iterates_in_indexer_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut dataset = Dataset::create(dir.path().join("iter.nv"), "", &[2, 2, 2], false)?;

    let coords: Vec<Vec<usize>> = dataset.indexer(0)?.iter().collect();
    for (i, c) in coords.iter().enumerate() {
        let mut vector = DataVector::from_real(vec![i as f64; 2]);
        vector.set_pt(c, 0);
        dataset.write_vector(&vector)?;
    }

    let firsts: Vec<f64> = dataset
        .vectors(0)?
        .map(|v| v.map(|v| v.real()[0]))
        .collect::<Result<_, _>>()?;
    assert_eq!(firsts, vec![0.0, 1.0, 2.0, 3.0]);
    Ok(())
}

// ==================== Indexer ====================

#[test]
fn test_indexer_order_first_outer_dim_fastest() {
    let indexer = VectorIndexer::new(0, &[5, 2, 3]);
    let coords: Vec<Vec<usize>> = indexer.iter().collect();
    assert_eq!(
        coords,
        vec![
            vec![0, 0],
            vec![1, 0],
            vec![0, 1],
            vec![1, 1],
            vec![0, 2],
            vec![1, 2],
        ]
    );
}

#[test]
fn test_indexer_skips_traversal_dim() {
    let indexer = VectorIndexer::new(1, &[2, 7, 3]);
    assert_eq!(indexer.extents(), &[2, 3]);
    assert_eq!(indexer.len(), 6);
}

#[test]
fn test_indexer_one_dimensional_yields_single_empty_tuple() {
    let indexer = VectorIndexer::new(0, &[16]);
    let coords: Vec<Vec<usize>> = indexer.iter().collect();
    assert_eq!(coords, vec![Vec::<usize>::new()]);
}

#[test]
fn test_indexer_zero_extent_yields_nothing() {
    let indexer = VectorIndexer::new(0, &[4, 0, 3]);
    assert!(indexer.is_empty());
    assert_eq!(indexer.iter().count(), 0);
}

#[test]
fn test_indexer_is_restartable() {
    let indexer = VectorIndexer::new(0, &[3, 3, 2]);
    let first: Vec<_> = indexer.iter().collect();
    let second: Vec<_> = (&indexer).into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(indexer.iter().len(), 6);
}

#[test]
fn test_indexer_rejects_bad_dim() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let dataset = Dataset::create(dir.path().join("idx.nv"), "", &[4, 4], false)?;
    assert!(matches!(
        dataset.indexer(2),
        Err(DatasetError::DimensionOutOfRange { dim: 2, n_dim: 2 })
    ));
    Ok(())
}

mod indexer_props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn covers_cross_product_once(
            sizes in prop::collection::vec(1usize..5, 1..5),
            dim_seed in 0usize..8,
        ) {
            let dim = dim_seed % sizes.len();
            let indexer = VectorIndexer::new(dim, &sizes);
            let expected: usize = sizes
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != dim)
                .map(|(_, &s)| s)
                .product();

            let coords: Vec<Vec<usize>> = indexer.iter().collect();
            prop_assert_eq!(coords.len(), expected);

            let unique: HashSet<Vec<usize>> = coords.iter().cloned().collect();
            prop_assert_eq!(unique.len(), expected);

            for c in &coords {
                for (index, extent) in c.iter().zip(indexer.extents()) {
                    prop_assert!(index < extent);
                }
            }
        }
    }
}

// ==================== Headers ====================

#[test]
fn test_header_persists_calibration() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("hdr.nv");
    let mut dataset = Dataset::create(&path, "", &[128, 32], false)?;
    {
        let dim = dataset.dim_header_mut(0)?;
        dim.sf = 600.13;
        dim.sw = 8000.0;
        dim.ref_value = 4.7;
        dim.label = "HN".to_string();
    }
    dataset.close()?;

    let dataset = Dataset::open(&path, false)?;
    let dim = dataset.dim_header(0)?;
    assert_eq!(dim.sf, 600.13);
    assert_eq!(dim.sw, 8000.0);
    assert_eq!(dim.label, "HN");
    Ok(())
}

#[test]
fn test_copy_header_keeps_target_layout() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut source = Dataset::create(dir.path().join("src.nv"), "", &[64, 16], false)?;
    source.dim_header_mut(1)?.label = "N15".to_string();
    source.dim_header_mut(1)?.sf = 60.8;

    let mut target = Dataset::create(dir.path().join("dst.nv"), "", &[32, 8], false)?;
    source.copy_header(&mut target, 1)?;
    assert_eq!(target.dim_header(1)?.label, "N15");
    assert_eq!(target.dim_header(1)?.sf, 60.8);
    assert_eq!(target.size(1)?, 8);

    let mut one_dim = Dataset::create(dir.path().join("one.nv"), "", &[32], false)?;
    assert!(source.copy_header(&mut one_dim, 1).is_err());
    Ok(())
}

#[test]
fn test_write_header_rejects_layout_change() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut dataset = Dataset::create(dir.path().join("layout.nv"), "", &[8, 8], false)?;
    dataset.dim_header_mut(0)?.size = 16;
    assert!(matches!(
        dataset.write_header(),
        Err(DatasetError::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn test_ppm_conversion() {
    let mut dim = DimHeader::new(100, 0);
    dim.sf = 500.0;
    dim.sw = 5000.0;
    dim.ref_value = 10.0;
    dim.ref_point = 0.0;

    assert_eq!(dim.point_to_ppm(0.0), 10.0);
    assert!((dim.point_to_ppm(50.0) - 5.0).abs() < 1e-12);
    assert!((dim.ppm_to_point(5.0) - 50.0).abs() < 1e-9);

    let (low, high) = dim.ppm_range();
    assert!((low - 0.1).abs() < 1e-9);
    assert_eq!(high, 10.0);
}

#[test]
fn test_values_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("values.nv");
    let mut dataset = Dataset::create(&path, "", &[4, 3], false)?;

    assert_eq!(dataset.values(1)?.len(), 3);
    dataset.set_values(1, vec![0.01, 0.02, 0.04])?;
    assert!(dataset.set_values(1, vec![1.0]).is_err());
    dataset.close()?;

    let dataset = Dataset::open(&path, false)?;
    assert_eq!(dataset.values(1)?, vec![0.01, 0.02, 0.04]);
    Ok(())
}

// ==================== In-memory datasets ====================

#[test]
fn test_from_vector() -> Result<(), Box<dyn std::error::Error>> {
    let mut vector = DataVector::from_real(vec![3.0, 1.0, 2.0]);
    vector.set_name("slice");
    let dataset = Dataset::from_vector(&vector, None);

    assert_eq!(dataset.name(), "slice");
    assert_eq!(dataset.sizes(), vec![3]);
    assert!(dataset.path().is_none());
    assert!(matches!(
        dataset.canonical_path(),
        Err(DatasetError::NotFileBacked(_))
    ));

    let mut read = DataVector::new(0, false);
    dataset.read_vector_at(&mut read, &[], 0)?;
    assert_eq!(read.real(), &[3.0, 1.0, 2.0]);
    Ok(())
}

// ==================== Vector helpers ====================

#[test]
fn test_zip_with_requires_matching_shape() {
    let a = DataVector::from_real(vec![1.0, 2.0]);
    let b = DataVector::from_real(vec![3.0, 4.0]);
    let sum = a.zip_with(&b, |x, y| x + y).unwrap();
    assert_eq!(sum.real(), &[4.0, 6.0]);

    let c = DataVector::new(2, true);
    assert!(a.zip_with(&c, |x, y| x + y).is_err());
    assert!(a.zip_with(&DataVector::new(3, false), |x, _| x).is_err());
}

#[test]
fn test_from_complex_length_mismatch() {
    assert!(DataVector::from_complex(vec![1.0], vec![1.0, 2.0]).is_err());
}

// ==================== Registry ====================

#[test]
fn test_registry_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("reg.nv");
    let dataset = Dataset::create(&path, "", &[4], false)?;

    let mut registry = DatasetRegistry::new();
    assert!(registry.register(&dataset));
    assert_eq!(registry.names(), vec!["reg.nv".to_string()]);
    assert!(registry.get("reg.nv").is_some_and(|e| e.writable));
    assert!(registry.find_path(&path).is_some());
    dataset.close()?;

    let reopened = registry.open("reg.nv")?;
    assert_eq!(reopened.sizes(), vec![4]);

    assert!(registry.unregister("reg.nv").is_some());
    assert!(registry.is_empty());
    assert!(matches!(
        registry.open("reg.nv"),
        Err(DatasetError::NotFound(_))
    ));

    let memory = Dataset::from_vector(&DataVector::new(2, false), None);
    assert!(!registry.register(&memory));
    Ok(())
}

#[test]
fn test_registry_tracks_live_writer() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let dataset = Dataset::create(dir.path().join("w.nv"), "", &[4], false)?;

    let mut registry = DatasetRegistry::new();
    registry.register(&dataset);
    assert!(registry.has_live_writer("w.nv"));
    assert!(matches!(
        registry.open("w.nv"),
        Err(DatasetError::WriterOpen(_))
    ));
    assert!(!registry.open_read("w.nv")?.is_writable());

    dataset.close()?;
    assert!(!registry.has_live_writer("w.nv"));
    let writer = registry.open("w.nv")?;
    assert!(registry.has_live_writer("w.nv"));
    drop(writer);
    assert!(!registry.has_live_writer("w.nv"));
    Ok(())
}
