use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use eyre::WrapErr;
use provmap::{BoundsMode, Error, Options};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "provmap")]
#[command(version)]
#[command(about = "Turn an SVG map into a JSON province data file")]
struct Cli {
    /// SVG map to convert
    #[arg(default_value = "EuropeSPD.svg")]
    input: PathBuf,

    /// Output file, defaults to `<input without extension>_data.json`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How bounding boxes are computed
    #[arg(long, value_enum, default_value = "lexical")]
    bounds: Bounds,

    /// Treat Inkscape layers as containers rather than provinces
    #[arg(long)]
    flatten_layers: bool,

    /// Keep owner/color edits from an existing output file
    #[arg(long)]
    merge: bool,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Bounds {
    /// Pair up every number in the path text
    Lexical,
    /// Follow the path commands and measure the curves
    Geometric,
}

impl From<Bounds> for BoundsMode {
    fn from(bounds: Bounds) -> Self {
        match bounds {
            Bounds::Lexical => BoundsMode::Lexical,
            Bounds::Geometric => BoundsMode::Geometric,
        }
    }
}

fn not_found(path: &Path) -> ExitCode {
    println!("Error: file '{}' not found!", path.display());
    println!("Place the SVG file in the working directory or pass its path as an argument.");
    ExitCode::FAILURE
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "provmap=warn",
        1 => "provmap=debug",
        _ => "provmap=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = Options {
        bounds: cli.bounds.into(),
        flatten_layers: cli.flatten_layers,
        merge: cli.merge,
    };
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| provmap::output_path(&cli.input));

    if !cli.input.is_file() {
        return Ok(not_found(&cli.input));
    }
    println!("Processing: {}", cli.input.display());

    let map = match provmap::svg2provinces(&cli.input, &output, &options) {
        Ok(map) => map,
        Err(Error::InputNotFound(path)) => return Ok(not_found(&path)),
        Err(err) => {
            return Err(err).wrap_err_with(|| format!("converting {}", cli.input.display()))
        }
    };

    println!("Found {} provinces", map.metadata.provinces_count);
    println!("Saved to: {}", output.display());
    println!();
    println!("Next steps:");
    println!("1. Open the JSON file to see your province data");
    println!("2. Update 'owner' and 'color' fields for each province as needed");
    println!("3. Use this JSON file in your application");

    if let Some(first) = map.provinces.first() {
        println!();
        println!("Sample province (first of {}):", map.provinces.len());
        println!("{}", serde_json::to_string_pretty(&first.preview())?);
    }

    Ok(ExitCode::SUCCESS)
}
