use itertools::iproduct;
use testing::{
    max_difference, max_reference_difference, pattern_image, reference_convolution,
    PixelTestingExt,
};
use tiled_blur::images::TypedImage;
use tiled_blur::pixels::{F32x4, PixelTrait, U8x4};
use tiled_blur::{
    testing as pass_log, BlurAlg, BlurError, BlurOptions, Blurrer, CacheFormat,
    DifferentDimensionsError, ImageView, Kernel, Kernel2d, TileSize,
};


const PACKED_EPS: f32 = 1. / 255. + 1e-5;

fn all_algorithms() -> [BlurAlg; 5] {
    [
        BlurAlg::joint(),
        BlurAlg::separable(CacheFormat::PackedRgba8),
        BlurAlg::separable(CacheFormat::Float),
        BlurAlg::Direct2d,
        BlurAlg::DirectSeparable,
    ]
}

fn blur<P: PixelTrait>(
    src_image: &TypedImage<P>,
    algorithm: BlurAlg,
    kernel: &Kernel,
) -> TypedImage<'static, P> {
    let mut dst_image = TypedImage::new(src_image.width(), src_image.height());
    let options = BlurOptions::new()
        .blur_alg(algorithm)
        .kernel(kernel.clone());
    Blurrer::new()
        .blur(src_image, &mut dst_image, &options)
        .unwrap();
    dst_image
}

fn is_packed(algorithm: BlurAlg) -> bool {
    matches!(
        algorithm,
        BlurAlg::Separable {
            cache: CacheFormat::PackedRgba8,
            ..
        }
    )
}

#[test]
fn float_results_match_reference() {
    let src_image = pattern_image::<F32x4>(37, 23);
    let kernel = Kernel::gaussian(5, 2.5).unwrap();
    let reference = reference_convolution(&src_image, &Kernel2d::outer(&kernel));

    for algorithm in all_algorithms() {
        let dst_image = blur(&src_image, algorithm, &kernel);
        let diff = max_reference_difference(&dst_image, &reference);
        let eps = if is_packed(algorithm) {
            PACKED_EPS as f64
        } else {
            1e-5
        };
        assert!(diff <= eps, "{algorithm:?}: difference is {diff}");
    }
}

#[test]
fn image_smaller_than_kernel_is_clamped_to_edges() {
    let kernel = Kernel::default();
    let kernel_2d = Kernel2d::outer(&kernel);
    for (width, height) in [(1, 1), (3, 2), (1, 40), (40, 1)] {
        let src_image = pattern_image::<F32x4>(width, height);
        let reference = reference_convolution(&src_image, &kernel_2d);
        for algorithm in all_algorithms().into_iter().filter(|&a| !is_packed(a)) {
            let dst_image = blur(&src_image, algorithm, &kernel);
            let diff = max_reference_difference(&dst_image, &reference);
            assert!(
                diff <= 1e-5,
                "{algorithm:?} {width}x{height}: difference is {diff}"
            );
        }
    }
}

#[test]
fn corner_impulse_is_reflected_by_clamping() {
    let mut src_image = TypedImage::<F32x4>::new(20, 20);
    src_image.pixels_mut()[0] = F32x4::new([1.; 4]);
    let kernel = Kernel::gaussian(3, 1.5).unwrap();
    let w = kernel.values();
    let r = kernel.radius() as usize;

    // Taps that fall out of the image to the left or to the top are
    // clamped onto the impulse.
    let corner_factor: f64 = w[..=r].iter().sum();
    let expected_corner = corner_factor * corner_factor;
    // Pixel (2, 0) sees the impulse through taps with `2 + i - r <= 0`.
    let expected_edge = w[..=r - 2].iter().sum::<f64>() * corner_factor;

    for algorithm in all_algorithms().into_iter().filter(|&a| !is_packed(a)) {
        let dst_image = blur(&src_image, algorithm, &kernel);
        let corner = dst_image.get_pixel(0, 0).unwrap().0[0] as f64;
        let edge = dst_image.get_pixel(2, 0).unwrap().0[0] as f64;
        assert!((corner - expected_corner).abs() < 1e-6, "{algorithm:?}");
        assert!((edge - expected_edge).abs() < 1e-6, "{algorithm:?}");
        // Blurring is symmetric with respect to the diagonal.
        let transposed = dst_image.get_pixel(0, 2).unwrap().0[0] as f64;
        assert!((transposed - edge).abs() < 1e-6, "{algorithm:?}");
    }
}

fn joint_and_separable_are_equivalent<P: PixelTestingExt>() {
    let src_image = pattern_image::<P>(64, 48);
    let kernel = Kernel::default();
    let joint = blur(&src_image, BlurAlg::joint(), &kernel);

    let float = blur(&src_image, BlurAlg::separable(CacheFormat::Float), &kernel);
    let diff = max_difference(&joint, &float);
    assert!(diff <= P::eps(), "float cache: difference is {diff}");

    let packed = blur(
        &src_image,
        BlurAlg::separable(CacheFormat::PackedRgba8),
        &kernel,
    );
    let diff = max_difference(&joint, &packed);
    assert!(diff <= PACKED_EPS, "packed cache: difference is {diff}");
}

#[test]
fn joint_and_separable_are_equivalent_u8x4() {
    joint_and_separable_are_equivalent::<U8x4>();
}

#[test]
fn joint_and_separable_are_equivalent_f32x4() {
    joint_and_separable_are_equivalent::<F32x4>();
}

#[test]
fn cached_and_direct_kernels_give_identical_results() {
    let kernel = Kernel::gaussian(7, 3.).unwrap();

    let src_image = pattern_image::<F32x4>(50, 33);
    let joint = blur(&src_image, BlurAlg::joint(), &kernel);
    let direct = blur(&src_image, BlurAlg::Direct2d, &kernel);
    assert_eq!(joint.pixels(), direct.pixels());
    let separable = blur(&src_image, BlurAlg::separable(CacheFormat::Float), &kernel);
    let direct = blur(&src_image, BlurAlg::DirectSeparable, &kernel);
    assert_eq!(separable.pixels(), direct.pixels());

    let src_image = pattern_image::<U8x4>(50, 33);
    let joint = blur(&src_image, BlurAlg::joint(), &kernel);
    let direct = blur(&src_image, BlurAlg::Direct2d, &kernel);
    assert_eq!(joint.pixels(), direct.pixels());
}

#[test]
fn results_do_not_depend_on_tile_size() {
    let src_image = pattern_image::<F32x4>(45, 29);
    let kernel = Kernel::gaussian(4, 2.).unwrap();
    let joint = blur(&src_image, BlurAlg::joint(), &kernel);
    let separable = blur(&src_image, BlurAlg::separable(CacheFormat::Float), &kernel);

    for (tile_width, tile_height) in iproduct!([1, 3, 16, 64], [1, 4, 16, 64]) {
        let tile = TileSize::new(tile_width, tile_height).unwrap();
        let res = blur(&src_image, BlurAlg::Joint(tile), &kernel);
        assert_eq!(res.pixels(), joint.pixels(), "joint, tile {tile:?}");

        let algorithm = BlurAlg::Separable {
            horizontal: tile,
            vertical: tile,
            cache: CacheFormat::Float,
        };
        let res = blur(&src_image, algorithm, &kernel);
        assert_eq!(res.pixels(), separable.pixels(), "separable, tile {tile:?}");
    }
}

#[test]
fn identity_kernels_copy_image() {
    let src_image = pattern_image::<U8x4>(29, 17);
    let kernels = [
        Kernel::identity(),
        Kernel::gaussian(0, 5.).unwrap(),
        Kernel::from_values(vec![0., 0., 1., 0., 0.]).unwrap(),
    ];
    for (kernel, algorithm) in iproduct!(&kernels, all_algorithms()) {
        let dst_image = blur(&src_image, algorithm, kernel);
        assert_eq!(
            dst_image.pixels(),
            src_image.pixels(),
            "{algorithm:?}, {kernel:?}"
        );
    }
}

#[test]
fn flat_image_stays_flat() {
    let kernel = Kernel::default();

    let pixel = U8x4::new([128, 64, 32, 255]);
    let src_image = TypedImage::filled(64, 64, pixel);
    for algorithm in all_algorithms() {
        let dst_image = blur(&src_image, algorithm, &kernel);
        assert!(
            dst_image.pixels().iter().all(|&p| p == pixel),
            "{algorithm:?}"
        );
    }

    let src_image = TypedImage::filled(64, 64, F32x4::new([0.5; 4]));
    for algorithm in all_algorithms().into_iter().filter(|&a| !is_packed(a)) {
        let dst_image = blur(&src_image, algorithm, &kernel);
        let diff = max_difference(&dst_image, &src_image);
        assert!(diff <= 1e-5, "{algorithm:?}: difference is {diff}");
    }
}

#[test]
fn impulse_response_is_symmetric_and_preserves_sum() {
    let size = 41;
    let center = 20;
    let mut src_image = TypedImage::<F32x4>::new(size, size);
    src_image.pixels_mut()[(center * size + center) as usize] = F32x4::new([1.; 4]);
    let kernel = Kernel::gaussian(5, 2.).unwrap();

    for algorithm in [BlurAlg::separable(CacheFormat::Float), BlurAlg::joint()] {
        let dst_image = blur(&src_image, algorithm, &kernel);
        let value = |dx: i32, dy: i32| {
            let x = (center as i32 + dx) as u32;
            let y = (center as i32 + dy) as u32;
            dst_image.get_pixel(x, y).unwrap().0[0]
        };
        for (dx, dy) in iproduct!(0..=6, 0..=6) {
            let v = value(dx, dy);
            assert_eq!(v, value(-dx, dy), "{algorithm:?}");
            assert_eq!(v, value(dx, -dy), "{algorithm:?}");
            assert_eq!(v, value(-dx, -dy), "{algorithm:?}");
            assert_eq!(v, value(dy, dx), "{algorithm:?}");
        }
        assert_eq!(value(6, 0), 0.);

        let sum: f32 = dst_image.pixels().iter().map(|p| p.0[0]).sum();
        assert!((sum - 1.).abs() < 1e-5, "{algorithm:?}: sum is {sum}");
    }
}

#[test]
fn passes_are_executed_in_order() {
    let src_image = pattern_image::<U8x4>(20, 10);
    let kernel = Kernel::gaussian(2, 1.).unwrap();
    let expected: [(BlurAlg, &[&str]); 4] = [
        (BlurAlg::joint(), &["joint pass"]),
        (
            BlurAlg::separable(CacheFormat::PackedRgba8),
            &["horizontal pass", "vertical pass"],
        ),
        (BlurAlg::Direct2d, &["direct 2d pass"]),
        (
            BlurAlg::DirectSeparable,
            &["direct horizontal pass", "direct vertical pass"],
        ),
    ];

    pass_log::clear_log();
    for (algorithm, passes) in expected {
        blur(&src_image, algorithm, &kernel);
        assert_eq!(pass_log::take_logs(), passes, "{algorithm:?}");
    }
}

#[test]
fn empty_images_are_ignored() {
    let mut blurrer = Blurrer::new();
    let options = BlurOptions::new();
    pass_log::clear_log();
    for (width, height) in [(0, 0), (0, 10), (10, 0)] {
        let src_image = TypedImage::<U8x4>::new(width, height);
        let mut dst_image = TypedImage::<U8x4>::new(width, height);
        assert!(blurrer.blur(&src_image, &mut dst_image, &options).is_ok());
    }
    assert!(!pass_log::logs_contain("pass"));
}

#[test]
fn different_dimensions_are_rejected() {
    let src_image = pattern_image::<U8x4>(20, 10);
    let mut dst_image = TypedImage::<U8x4>::new(10, 20);
    let res = Blurrer::new().blur(&src_image, &mut dst_image, &BlurOptions::new());
    assert_eq!(
        res,
        Err(BlurError::DifferentDimensions(DifferentDimensionsError))
    );

    let kernel = Kernel2d::outer(&Kernel::identity());
    let res = Blurrer::new().convolve_2d(&src_image, &mut dst_image, &kernel, TileSize::JOINT);
    assert_eq!(
        res,
        Err(BlurError::DifferentDimensions(DifferentDimensionsError))
    );
}

#[test]
fn blurrer_can_be_reused_for_images_of_different_sizes() {
    let kernel = Kernel::gaussian(6, 3.).unwrap();
    let algorithms = [
        BlurAlg::separable(CacheFormat::PackedRgba8),
        BlurAlg::separable(CacheFormat::Float),
        BlurAlg::DirectSeparable,
    ];
    let mut blurrer = Blurrer::new();
    for (algorithm, (width, height)) in iproduct!(algorithms, [(60, 40), (13, 71), (30, 30)]) {
        let src_image = pattern_image::<U8x4>(width, height);
        let mut dst_image = TypedImage::new(width, height);
        let options = BlurOptions::new()
            .blur_alg(algorithm)
            .kernel(kernel.clone());
        blurrer.blur(&src_image, &mut dst_image, &options).unwrap();

        let expected = blur(&src_image, algorithm, &kernel);
        assert_eq!(dst_image.pixels(), expected.pixels(), "{algorithm:?}");
    }
}

#[test]
fn convolve_2d_with_asymmetric_kernel() {
    // Single tap at the top-right corner of 3x3 kernel, so every pixel
    // takes the value of its upper-right neighbour.
    let mut values = vec![0.; 9];
    values[2] = 1.;
    let kernel = Kernel2d::from_values(1, values).unwrap();
    let src_image = pattern_image::<U8x4>(23, 19);
    let mut dst_image = TypedImage::<U8x4>::new(23, 19);
    let tile = TileSize::new(8, 8).unwrap();
    Blurrer::new()
        .convolve_2d(&src_image, &mut dst_image, &kernel, tile)
        .unwrap();

    for (x, y) in iproduct!(0..23, 0..19) {
        let expected = src_image.get_pixel((x + 1).min(22), y.max(1) - 1);
        assert_eq!(dst_image.get_pixel(x, y), expected, "x={x} y={y}");
    }
}
