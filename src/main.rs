// ABOUTME: Main entry point for the openxml-pptx program.
// ABOUTME: Provides a CLI that assembles a presentation from a title and images.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::info;
use openxml_pptx::{utils, Config, Document, PictureOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log each step of the build
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a PPTX with an optional title slide and one slide per image
    Build(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Path to output PPTX file (".pptx" is appended when missing)
    #[arg(short, long)]
    output: PathBuf,

    /// Text of a title slide placed before the image slides
    #[arg(long)]
    title: Option<String>,

    /// Scale factor applied to every picture
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Directory searched for additional images
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Glob pattern used with --input-dir
    #[arg(long, default_value = "*.png")]
    pattern: String,

    /// Template directory (defaults to PPTX_TEMPLATE_DIR or the bundled template)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Images to place on slides, in order
    images: Vec<PathBuf>,
}

fn build(args: &BuildArgs) -> anyhow::Result<PathBuf> {
    let mut images = args.images.clone();
    if let Some(dir) = &args.input_dir {
        let found = utils::find_images(dir, &args.pattern)
            .with_context(|| format!("Failed to search {:?}", dir))?;
        info!("Found {} images in {:?}", found.len(), dir);
        images.extend(found);
    }

    if args.title.is_none() && images.is_empty() {
        bail!("Nothing to build: pass --title, images or --input-dir");
    }

    let mut config = Config::from_env();
    if let Some(template) = &args.template {
        config = config.with_template_dir(template);
    }

    let mut document = Document::with_config(config).context("Failed to create document")?;

    if let Some(title) = &args.title {
        document.add_slide()?.add_text_box(title)?;
    }

    let options = PictureOptions::new().with_scale(args.scale);
    for image in &images {
        document
            .add_slide()?
            .add_picture(image, &options)
            .with_context(|| format!("Failed to add picture {:?}", image))?;
    }

    let output = document
        .save(&args.output)
        .with_context(|| format!("Failed to save {:?}", args.output))?;
    document.close()?;
    Ok(output)
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match &cli.command {
        Some(Commands::Build(args)) => build(args).map(|output| {
            println!("PPTX generated successfully: {:?}", output);
        }),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
