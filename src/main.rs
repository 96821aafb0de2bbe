// src/main.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use pigeonhole::config;
use pigeonhole::note;
use pigeonhole::routing::types::RoutingContext;
use pigeonhole::routing::{Classifier, Router};

#[derive(Parser)]
#[command(
    name = "pigeonhole",
    version,
    about = "Route transcribed voice notes to project destinations"
)]
struct Cli {
    /// Routing config file (TOML or JSON)
    #[arg(short, long, global = true, default_value = "routes.toml")]
    config: PathBuf,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a transcript and print the winning route and output path
    Route {
        /// Transcript text file
        transcript: PathBuf,

        /// Recording timestamp (RFC 3339); defaults to now
        #[arg(long)]
        date: Option<DateTime<Utc>>,

        /// Source filename recorded in metadata; defaults to the transcript filename
        #[arg(long)]
        source: Option<String>,

        /// Emit the decision and output path as JSON
        #[arg(long)]
        json: bool,

        /// Write the note at the routed path
        #[arg(long)]
        write: bool,
    },

    /// Print every candidate route with its signals and confidence
    Classify {
        /// Transcript text file
        transcript: PathBuf,

        /// Recording timestamp (RFC 3339); defaults to now
        #[arg(long)]
        date: Option<DateTime<Utc>>,

        /// Source filename recorded in metadata; defaults to the transcript filename
        #[arg(long)]
        source: Option<String>,

        /// Emit the ranked candidates as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let file = config::load(&cli.config)?;

    match cli.command {
        Command::Route {
            transcript,
            date,
            source,
            json,
            write,
        } => {
            let context = read_context(&transcript, date, source)?;
            let router = Router::new(&file.routing, &file.entities);
            let decision = router.route(&context);
            let path = router.build_output_path(&decision, &context);

            if json {
                let payload = serde_json::json!({
                    "decision": &decision,
                    "output_path": path.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                match &decision.project_id {
                    Some(id) => println!("route: {id} (confidence {:.2})", decision.confidence),
                    None => println!("route: default"),
                }
                println!("reason: {}", decision.reasoning);
                if let Some(alternates) = &decision.alternate_matches {
                    for alt in alternates {
                        println!(
                            "also considered: {} (confidence {:.2})",
                            alt.project_id, alt.confidence
                        );
                    }
                }
                println!("path: {}", path.display());
            }

            if write {
                note::write_note(&decision, &context, &path)?;
            }
        }

        Command::Classify {
            transcript,
            date,
            source,
            json,
        } => {
            let context = read_context(&transcript, date, source)?;
            let classifier = Classifier::new(&file.entities);
            let results = classifier.classify(&context, &file.routing.projects);

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.is_empty() {
                println!("no candidate routes matched");
            } else {
                for result in &results {
                    println!(
                        "{} (confidence {:.2}): {}",
                        result.project_id, result.confidence, result.reasoning
                    );
                }
            }
        }
    }

    Ok(())
}

fn read_context(
    transcript: &Path,
    date: Option<DateTime<Utc>>,
    source: Option<String>,
) -> Result<RoutingContext> {
    let text = fs::read_to_string(transcript)
        .with_context(|| format!("failed to read transcript {}", transcript.display()))?;

    let source_file = source.unwrap_or_else(|| {
        transcript
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    Ok(RoutingContext {
        transcript_text: text,
        audio_date: date.unwrap_or_else(Utc::now),
        source_file,
        hash: None,
        detected_people: None,
        detected_companies: None,
    })
}
