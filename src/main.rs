// Mark Clipper command-line front end.
//
// Runs the content pipeline over clip JSON (a single clip object or an array
// of clips, from a file or stdin) and prints the results as JSON.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use mark_clipper::content::content_preview;
use mark_clipper::{
    Clip, ContentOptions, ContentStrategy, DisplayContent, PipelineConfig, QualityAssessment,
    ValidationOptions, ValidationReport, validate_clip_content,
};

/// Characters of searchable text shown in a report
const REPORT_PREVIEW_CHARS: usize = 160;

#[derive(Parser, Debug)]
#[command(name = "mark-clipper", version, about = "Sanitize, normalize and inspect captured web clips")]
struct Cli {
    /// JSON pipeline configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the strict tag allow-list
    #[arg(long, global = true)]
    strict: bool,

    /// Bypass the translation cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Use the regex strategies only, without DOM parsing
    #[arg(long, global = true)]
    no_dom: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render-safe display content
    Display {
        /// Clip JSON file, or `-` for stdin
        clip: PathBuf,
    },

    /// Content for the rich-text editor
    Edit {
        /// Clip JSON file, or `-` for stdin
        clip: PathBuf,

        /// Translate the HTML instead of returning it untouched
        #[arg(long)]
        translate: bool,
    },

    /// Markup-free text for search indexing
    Search {
        /// Clip JSON file, or `-` for stdin
        clip: PathBuf,
    },

    /// Completeness score
    Quality {
        /// Clip JSON file, or `-` for stdin
        clip: PathBuf,
    },

    /// Advisory validation report
    Validate {
        /// Clip JSON file, or `-` for stdin
        clip: PathBuf,
    },

    /// Display, quality and validation together
    Report {
        /// Clip JSON file, or `-` for stdin
        clip: PathBuf,
    },
}

#[derive(Serialize)]
struct ClipReport<'a> {
    id: String,
    title: &'a str,
    category: &'a str,
    display: DisplayContent,
    preview: String,
    quality: QualityAssessment,
    validation: ValidationReport,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let strategy = ContentStrategy::new(&config);
    let options = config.defaults().clone();

    match &cli.command {
        Commands::Display { clip } => {
            let clips = read_clips(clip)?;
            let results = strategy.get_display_content_batch(&clips, &options);
            print_json(&results)
        }
        Commands::Edit { clip, translate } => {
            let options = ContentOptions {
                preserve_formatting: !translate,
                ..options
            };
            let results: Vec<DisplayContent> = read_clips(clip)?
                .iter()
                .map(|clip| strategy.get_edit_content(clip, &options))
                .collect();
            print_json(&results)
        }
        Commands::Search { clip } => {
            for clip in read_clips(clip)? {
                println!("{}", strategy.get_searchable_content(&clip));
            }
            Ok(())
        }
        Commands::Quality { clip } => {
            let results: Vec<QualityAssessment> = read_clips(clip)?
                .iter()
                .map(|clip| strategy.assess_content_quality(clip))
                .collect();
            print_json(&results)
        }
        Commands::Validate { clip } => {
            let validation = validation_options(&options);
            let results: Vec<ValidationReport> = read_clips(clip)?
                .iter()
                .map(|clip| validate_clip_content(clip, &validation))
                .collect();
            print_json(&results)
        }
        Commands::Report { clip } => {
            let validation = validation_options(&options);
            let clips = read_clips(clip)?;
            let reports: Vec<ClipReport<'_>> = clips
                .iter()
                .map(|clip| ClipReport {
                    id: clip.id.to_string(),
                    title: &clip.title,
                    category: &clip.category,
                    display: strategy.get_display_content(clip, &options),
                    preview: content_preview(
                        &strategy.get_searchable_content(clip),
                        REPORT_PREVIEW_CHARS,
                    ),
                    quality: strategy.assess_content_quality(clip),
                    validation: validate_clip_content(clip, &validation),
                })
                .collect();
            print_json(&reports)
        }
    }
}

/// Configuration file (or defaults) with command-line overrides applied
fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let base = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    let mut builder = base.into_builder();
    if cli.strict {
        builder = builder.strict_mode(true);
    }
    if cli.no_cache {
        builder = builder.use_cache(false);
    }
    if cli.no_dom {
        builder = builder.dom_parsing(false);
    }
    builder.build().context("Invalid configuration")
}

fn validation_options(options: &ContentOptions) -> ValidationOptions {
    ValidationOptions {
        max_length: options.max_length,
        ..ValidationOptions::default()
    }
}

/// Read one clip object or an array of clips
fn read_clips(path: &Path) -> Result<Vec<Clip>> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read clip JSON from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    let value: serde_json::Value = serde_json::from_str(&json).context("Clip input is not JSON")?;
    let clips = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|clip| vec![clip])
    };
    clips.context("Clip input does not match the clip schema")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
