use anyhow::{Context, Result};
use clap::Parser;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{ColorType, ImageEncoder, RgbaImage};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

mod manifest_json;
mod renderer;

/// The icon sizes the app manifest declares, smallest to largest.
const DEFAULT_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

#[derive(Debug, Parser)]
#[clap(
    name = "pwa-icon-gen",
    about = "Generate the Habit Tracker 2026 PWA icon set"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = "icons")]
    output: PathBuf,

    /// Custom icon sizes to generate. When set, only these sizes are generated.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    sizes: Option<Vec<u32>>,

    /// Path to a TrueType caption font, replacing the platform search list.
    #[clap(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Also write a Web App Manifest icons fragment next to the icons.
    #[clap(long)]
    manifest: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    fs::create_dir_all(&args.output).context("Can't create output directory")?;

    let sizes: &[u32] = args.sizes.as_deref().unwrap_or(&DEFAULT_SIZES);

    println!("Generating Habit Tracker 2026 PWA Icons...");
    println!("{}", "-".repeat(40));

    for &size in sizes {
        let icon = renderer::render_icon(size, args.font.as_deref());
        let path = args.output.join(format!("icon-{size}x{size}.png"));
        write_png(&icon, &path)?;

        let bytes = fs::metadata(&path)
            .with_context(|| format!("Can't stat {}", path.display()))?
            .len();
        println!("  ✓ {} ({} bytes)", path.display(), group_thousands(bytes));
    }

    if args.manifest {
        manifest_json::write_manifest_icons(&args.output, sizes)?;
        println!("  ✓ {}", args.output.join("manifest-icons.json").display());
    }

    println!("{}", "-".repeat(40));
    println!("All icons generated successfully!");
    println!();
    println!("Icons include:");
    println!("  • Purple gradient background");
    println!("  • Progress circle indicator");
    println!("  • Checkmark symbol");
    println!("  • '2026' text (144px+)");

    Ok(())
}

/// Encode the icon losslessly with the strongest PNG compression settings.
fn write_png(icon: &RgbaImage, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Can't create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let encoder =
        PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilterType::Adaptive);
    encoder
        .write_image(icon.as_raw(), icon.width(), icon.height(), ColorType::Rgba8)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    out.flush()?;
    Ok(())
}

/// Formats a byte count with comma thousands separators for the progress log.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
