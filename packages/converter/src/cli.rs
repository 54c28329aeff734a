//! Command-line interface for the converter.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{ConvertOptions, DuplicateChapterPolicy, IndexLocation, DEFAULT_OUTPUT_DIR};
use crate::converter::convert_file;
use crate::error::{ConverterError, Result};

/// Normattiva Converter - Turn Normattiva XML exports into Sphinx reStructuredText.
#[derive(Parser)]
#[command(name = "normattiva-converter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an XML export into a chapter/section/article file tree.
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Normattiva XML export to convert
    pub input: PathBuf,

    /// Output directory (default: docs/_rst)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Extension of the generated files, without the dot (default: rst)
    #[arg(long)]
    pub extension: Option<String>,

    /// Write the index inside the output directory instead of its parent
    #[arg(long)]
    pub index_inside: bool,

    /// Document title written at the top of the index
    #[arg(long)]
    pub title: Option<String>,

    /// Document subtitle written below the title
    #[arg(long)]
    pub subtitle: Option<String>,

    /// YAML file with conversion options; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// What to do when a chapter is opened twice
    #[arg(long, value_enum)]
    pub on_duplicate: Option<DuplicateChapterPolicy>,
}

impl ConvertArgs {
    /// Options from the config file (or defaults) with flags applied on top.
    pub fn options(&self) -> Result<ConvertOptions> {
        let mut options = match &self.config {
            Some(path) => ConvertOptions::from_yaml_file(path)?,
            None => ConvertOptions::default(),
        };

        if let Some(extension) = &self.extension {
            options = options.with_extension(extension.clone());
        }
        if self.index_inside {
            options = options.with_index_location(IndexLocation::Inside);
        }
        if let Some(title) = &self.title {
            options = options.with_document_title(title.clone());
        }
        if let Some(subtitle) = &self.subtitle {
            options = options.with_document_subtitle(subtitle.clone());
        }
        if let Some(policy) = self.on_duplicate {
            options = options.with_duplicate_chapters(policy);
        }

        options.validate()?;
        Ok(options)
    }

    /// Output directory, falling back to the default.
    pub fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => convert_command(&args),
    }
}

/// Execute the convert command.
fn convert_command(args: &ConvertArgs) -> Result<()> {
    let options = args.options()?;
    let output_dir = args.output_dir();
    check_paths(&args.input, &output_dir)?;

    println!(
        "{} {} into {}",
        style("Converting").bold(),
        style(args.input.display()).cyan(),
        style(output_dir.display()).green()
    );
    println!();

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message("Parsing and writing files...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = match convert_file(&args.input, &output_dir, &options) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    println!("  Chapters: {}", report.chapters);
    println!("  Sections: {}", report.sections);
    println!("  Articles: {}", report.articles);
    println!();
    println!(
        "{} {} files, index at {}",
        style("Wrote").green().bold(),
        report.files_written(),
        report.index.display()
    );

    Ok(())
}

/// Fail early on a missing input or an output path that is not a directory.
fn check_paths(input: &Path, output_dir: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(ConverterError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file does not exist: {}", input.display()),
        )));
    }
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(ConverterError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Output path is not a directory: {}", output_dir.display()),
        )));
    }
    Ok(())
}
