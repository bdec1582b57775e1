use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;

use polyscan::{Mode, ScanOptions, ScanOutcome, ScanPipeline};

#[derive(Parser)]
#[command(name = "polyscan")]
#[command(about = "Decode a barcode/QR symbol from a photographed frame")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Use the low-light parameter set (enable in dim rooms)
    #[arg(long)]
    low_light: bool,

    /// Skip the median denoise step
    #[arg(long)]
    no_denoise: bool,

    /// Save each attempted stage image to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_module("polyscan", log::LevelFilter::Debug);
    }
    logger.init();

    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    if args.verbose {
        println!("Image loaded: {}x{}\n", img.width(), img.height());
    }

    let options = ScanOptions {
        denoise: !args.no_denoise,
        ..ScanOptions::default()
    };
    let mut pipeline = ScanPipeline::new().with_options(options);
    if let Some(debug_dir) = args.debug_out {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let mode = if args.low_light {
        Mode::LowLight
    } else {
        Mode::Standard
    };

    match pipeline.scan(&img, mode)? {
        ScanOutcome::Found { symbol, stage, .. } => {
            println!("=== Scan Result ===");
            println!("Payload:   {}", symbol.payload);
            println!("Symbology: {}", symbol.symbology);
            println!("Stage:     {}", stage);
            if let Some(region) = symbol.region {
                println!(
                    "Region:    {}x{} at ({}, {})",
                    region.width, region.height, region.x, region.y
                );
            }
        }
        ScanOutcome::NotFound { attempts, .. } => {
            println!("No symbol found after {} decode attempts.", attempts);
            if !args.low_light {
                println!("Hint: retry with --low-light if the photo was taken in a dim room.");
            }
        }
    }

    Ok(())
}
