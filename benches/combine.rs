use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dscript::dataset::{DataVector, Dataset};
use dscript::peaks::{PeakPickParams, PeakPicker, PickOptions};
use dscript::script::{combine, DatasetSource, ScriptConfig, ScriptContext};
use std::path::Path;
use tempfile::TempDir;

/// Write a 2-D dataset filled with a smooth synthetic signal
fn generate_dataset(path: &Path, nx: usize, ny: usize, phase: f64) -> Dataset {
    let mut dataset = Dataset::create(path, "bench", &[nx, ny], true).expect("create failed");
    for y in 0..ny {
        let values = (0..nx)
            .map(|x| ((x as f64 * 0.05 + phase).sin() * (y as f64 * 0.11).cos()) * 1e4)
            .collect();
        let mut row = DataVector::from_real(values);
        row.set_pt(&[y], 0);
        dataset.write_vector(&row).expect("write failed");
    }
    dataset
}

fn bench_combine_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_pair");

    for (nx, ny) in [(512, 64), (1024, 256)] {
        group.throughput(Throughput::Elements((nx * ny) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", nx, ny)),
            &(nx, ny),
            |b, &(nx, ny)| {
                b.iter_batched(
                    || {
                        let temp_dir = TempDir::new().unwrap();
                        let a = generate_dataset(&temp_dir.path().join("a.nv"), nx, ny, 0.0);
                        let b = generate_dataset(&temp_dir.path().join("b.nv"), nx, ny, 0.3);
                        (temp_dir, a, b)
                    },
                    |(temp_dir, a, b)| {
                        let out = temp_dir.path().join("sum.nv");
                        combine::combine(
                            |va: &DataVector, vb: &DataVector| {
                                va.zip_with(vb, |x, y| x + y).expect("same shape")
                            },
                            &out,
                            &a,
                            &b,
                        )
                        .expect("combine failed");
                        drop(temp_dir);
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_combine_n(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_n");

    for inputs in [2, 4, 8] {
        let (nx, ny) = (512, 128);
        group.throughput(Throughput::Elements((nx * ny * inputs) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}inputs", inputs)),
            &inputs,
            |b, &inputs| {
                b.iter_batched(
                    || {
                        let temp_dir = TempDir::new().unwrap();
                        for i in 0..inputs {
                            let path = temp_dir.path().join(format!("in{}.nv", i));
                            generate_dataset(&path, nx, ny, i as f64 * 0.1)
                                .close()
                                .expect("close failed");
                        }
                        temp_dir
                    },
                    |temp_dir| {
                        let ctx = ScriptContext::new(ScriptConfig::with_base_dir(temp_dir.path()));
                        let sources: Vec<DatasetSource> = (0..inputs)
                            .map(|i| DatasetSource::from(format!("in{}.nv", i)))
                            .collect();
                        ctx.combine_n(
                            |vs: &[DataVector]| {
                                let n = vs.len() as f64;
                                let mut sum = vs[0].clone();
                                for v in &vs[1..] {
                                    sum = sum.zip_with(v, |x, y| x + y).expect("same shape");
                                }
                                sum.map(|x| x / n)
                            },
                            "mean.nv",
                            &sources,
                        )
                        .expect("combine_n failed");
                        drop(temp_dir);
                    },
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("peak_pick");
    let temp_dir = TempDir::new().unwrap();
    let dataset = generate_dataset(&temp_dir.path().join("pick.nv"), 1024, 128, 0.0);
    group.throughput(Throughput::Elements(1024 * 128));

    group.bench_function("local_extrema_1024x128", |b| {
        b.iter(|| {
            let params = PeakPickParams::new(&dataset, "pick", &PickOptions::default().level(100.0))
                .expect("params failed");
            PeakPicker::new(params).pick(&dataset).expect("pick failed")
        });
    });

    group.finish();
}

criterion_group!(benches, bench_combine_pair, bench_combine_n, bench_pick);
criterion_main!(benches);
