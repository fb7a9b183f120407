use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use image::{DynamicImage, ImageReader};
use log::debug;
use tiled_blur as tb;
use tiled_blur::{BlurOptions, Kernel};

mod structs;

#[derive(Parser)]
#[clap(author = "Kirill K.")]
#[clap(version, about, long_about = None)]
#[clap(disable_help_flag = true)]
struct Cli {
    #[clap(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,

    /// Path to source image file
    #[clap(value_parser)]
    source_path: PathBuf,

    /// Path to result image file
    #[clap(value_parser)]
    destination_path: Option<PathBuf>,

    /// Radius of Gaussian kernel, the kernel has `2 * radius + 1` coefficients
    #[clap(short, long, value_parser, default_value_t = tb::DEFAULT_RADIUS)]
    radius: u32,

    /// Standard deviation of Gaussian kernel
    #[clap(short, long, value_parser, default_value_t = tb::DEFAULT_SIGMA)]
    sigma: f64,

    /// Overwrite destination file
    #[clap(short, long, action)]
    overwrite: bool,

    /// Algorithm used to blur image
    #[clap(short, long, value_enum, default_value_t = structs::Algorithm::Separable)]
    algorithm: structs::Algorithm,

    /// Format of pixels in caches and intermediate image of the "separable" algorithm
    #[clap(short, long, value_enum, default_value_t = structs::CacheFormat::Packed)]
    cache: structs::CacheFormat,

    /// Size of tile of the "joint" algorithm
    #[clap(long, value_parser, default_value = "16x16")]
    joint_tile: structs::Tile,

    /// Size of tile of the horizontal pass of the "separable" algorithm
    #[clap(long, value_parser, default_value = "64x1")]
    horizontal_tile: structs::Tile,

    /// Size of tile of the vertical pass of the "separable" algorithm
    #[clap(long, value_parser, default_value = "1x64")]
    vertical_tile: structs::Tile,

    /// Use f32 as pixel components of the source and result images.
    #[clap(long, action)]
    high_precision: bool,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    blur(&cli)
}

fn blur(cli: &Cli) -> Result<()> {
    let src_image = open_source_image(cli)?;
    let mut dst_image = match src_image {
        DynamicImage::ImageRgba32F(_) => {
            DynamicImage::new_rgba32f(src_image.width(), src_image.height())
        }
        _ => DynamicImage::new_rgba8(src_image.width(), src_image.height()),
    };

    let kernel = Kernel::gaussian(cli.radius, cli.sigma).with_context(|| "Invalid kernel")?;
    let options = BlurOptions::new()
        .blur_alg(get_blur_algorithm(cli))
        .kernel(kernel);
    let mut blurrer = tb::Blurrer::new();

    debug!(
        "Blur the source image {}x{}",
        src_image.width(),
        src_image.height()
    );
    blurrer
        .blur_image(&src_image, &mut dst_image, &options)
        .with_context(|| "Failed to blur image")?;

    save_result(cli, dst_image)
}

fn open_source_image(cli: &Cli) -> Result<DynamicImage> {
    let source_path = &cli.source_path;
    debug!("Opening the source image {:?}", source_path);
    let image = ImageReader::open(source_path)
        .with_context(|| format!("Failed to read source file from {:?}", source_path))?
        .decode()
        .with_context(|| "Failed to decode source image")?;

    let image = if cli.high_precision {
        debug!("Convert the source image into RGBA32F");
        DynamicImage::ImageRgba32F(image.into_rgba32f())
    } else {
        debug!("Convert the source image into RGBA8");
        DynamicImage::ImageRgba8(image.into_rgba8())
    };
    Ok(image)
}

fn get_blur_algorithm(cli: &Cli) -> tb::BlurAlg {
    match cli.algorithm {
        structs::Algorithm::Joint => tb::BlurAlg::Joint(cli.joint_tile.0),
        structs::Algorithm::Separable => tb::BlurAlg::Separable {
            horizontal: cli.horizontal_tile.0,
            vertical: cli.vertical_tile.0,
            cache: cli.cache.into(),
        },
        structs::Algorithm::Direct2d => tb::BlurAlg::Direct2d,
        structs::Algorithm::DirectSeparable => tb::BlurAlg::DirectSeparable,
    }
}

fn save_result(cli: &Cli, image: DynamicImage) -> Result<()> {
    let result_path = if let Some(path) = cli.destination_path.clone() {
        path
    } else {
        let mut path = PathBuf::from("./");
        let ext = cli
            .source_path
            .extension()
            .unwrap_or_else(|| OsStr::new("png"));
        path.push("result");
        path.set_extension(ext);
        path
    };
    if result_path.exists() && !cli.overwrite {
        return Err(anyhow!(
            "Destination path {:?} already exists.",
            result_path
        ));
    };

    // Most of formats can't store float pixels.
    let image = match image {
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.into_rgba16()),
        image => image,
    };

    debug!("Save the result image into the file {:?}", result_path);
    image
        .save(result_path)
        .with_context(|| "Failed to save the result image")?;
    Ok(())
}
