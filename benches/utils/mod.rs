use std::env;
use std::path::PathBuf;

use criterion::measurement::WallTime;
use criterion::{Bencher, BenchmarkGroup, BenchmarkId, Criterion};
use tiled_blur::images::TypedImage;
use tiled_blur::pixels::{F32x4, PixelTrait, U8x4};

pub type BenchGroup<'a> = BenchmarkGroup<'a, WallTime>;

pub fn run_bench<F>(bench_fn: F, name: &str)
where
    F: FnOnce(&mut BenchGroup),
{
    let mut criterion = Criterion::default()
        .output_directory(&criterion_output_directory())
        .configure_from_args();
    let mut group = criterion.benchmark_group(name);
    bench_fn(&mut group);
    group.finish();
    criterion.final_summary();
}

pub fn bench<S1, S2, F>(
    group: &mut BenchGroup,
    sample_size: usize,
    func_name: S1,
    parameter: S2,
    mut f: F,
) where
    S1: Into<String>,
    S2: Into<String>,
    F: FnMut(&mut Bencher),
{
    let parameter = parameter.into();
    group.sample_size(sample_size);
    group.bench_with_input(
        BenchmarkId::new(func_name.into(), &parameter),
        &parameter,
        |bencher, _| f(bencher),
    );
}

fn criterion_output_directory() -> PathBuf {
    if let Some(value) = env::var_os("CRITERION_HOME") {
        PathBuf::from(value)
    } else {
        PathBuf::from("target/criterion")
    }
}

pub trait PixelBenchExt: PixelTrait {
    const NAME: &'static str;

    fn gradient(x: u32, y: u32) -> Self;
}

impl PixelBenchExt for U8x4 {
    const NAME: &'static str = "U8x4";

    fn gradient(x: u32, y: u32) -> Self {
        U8x4::new([x as u8, y as u8, (x ^ y) as u8, 255])
    }
}

impl PixelBenchExt for F32x4 {
    const NAME: &'static str = "F32x4";

    fn gradient(x: u32, y: u32) -> Self {
        F32x4::new(U8x4::gradient(x, y).to_f32x4())
    }
}

pub fn source_image<P: PixelBenchExt>(width: u32, height: u32) -> TypedImage<'static, P> {
    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| P::gradient(x, y)))
        .collect();
    TypedImage::from_pixels(width, height, pixels).unwrap()
}
