use clap::Parser;
use contrast_overlay::{overlay_color, OverlayOptions, Palette, PaletteDocument};
use log::info;
use std::{fs::File, io::BufReader, path::PathBuf};

/// Print a readable overlay color for an image or a JSON palette.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Image file, or a JSON palette document with --json
    file: PathBuf,

    /// Read the file as a JSON palette document instead of an image
    #[arg(long)]
    json: bool,

    /// Hue rotation of the overlay color, as a fraction of a full turn
    #[arg(long, default_value_t = contrast_overlay::DEFAULT_HUE_SHIFT, allow_negative_numbers = true)]
    hue_shift: f64,

    /// Contrast ratio to reach against the image
    #[arg(long, default_value_t = contrast_overlay::DEFAULT_CONTRAST_RATIO)]
    ratio: f64,

    /// How many colors to quantize the image into
    #[arg(long, default_value_t = contrast_overlay::DEFAULT_COLOR_COUNT)]
    colors: usize,

    /// Sample the dominant colors when there are any
    #[arg(long)]
    dominant: bool,
}

fn main() -> contrast_overlay::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let options = OverlayOptions::default()
        .hue_shift(args.hue_shift)
        .contrast_ratio(args.ratio)
        .color_count(args.colors)
        .dominance(args.dominant);

    let overlay = if args.json {
        let document = PaletteDocument::from_reader(BufReader::new(File::open(&args.file)?))?;
        overlay_color(&document, &options)?
    } else {
        let palette = Palette::from_path(&args.file)?
            .maximum_color_count(options.get_color_count())
            .generate();
        info!("sampled {} swatches from {}", palette.swatches().len(), args.file.display());

        overlay_color(&palette, &options)?
    };

    println!("{}", serde_json::to_string_pretty(&overlay)?);
    Ok(())
}
