//! Tolerance calibration
//!
//! Prints the max difference between the reference and every other image,
//! which is the minimum tolerance that would match it. Only PNG files are
//! picked up from `--dir`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use auto_fishing::screen_reader::{difference, load_reference};

#[derive(Parser, Debug)]
#[command(name = "calibrate")]
#[command(about = "Propose the minimum tolerance for screenshots of the interact prompt")]
struct Args {
    /// Reference image of the interact prompt
    reference: PathBuf,

    /// Images to compare with the reference
    images: Vec<PathBuf>,

    /// Directory with PNG images to compare as well
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

fn png_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Cannot read directory {:?}", dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    files.sort();
    Ok(files)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let reference = load_reference(&args.reference)
        .with_context(|| format!("Failed to load reference {:?}", args.reference))?;

    let mut images = args.images;
    if let Some(dir) = &args.dir {
        images.extend(png_files(dir)?);
    }

    for path in images {
        let sample = load_reference(&path).with_context(|| format!("Failed to load {:?}", path))?;
        let tolerance = difference(&reference, &sample)?;
        println!("Tolerance for {:?}:", path);
        println!("tolerance={}", tolerance);
        println!("{}", "-".repeat(20));
    }

    Ok(())
}
