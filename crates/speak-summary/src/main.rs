use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Parser;
use shared::{
    list_analysis_files, load_analysis, translate_summary, CompanyAnalysis, Config, Language,
    SpeechSynthesizer,
};
use std::io::{self, Write as _};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "speak-summary")]
#[command(about = "Read a saved company analysis aloud in one of six languages")]
struct Args {
    /// Path to the analysis JSON (if not provided, will list saved analyses)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Language code, name, or menu number 1-6 (prompts if omitted)
    #[arg(short, long)]
    language: Option<String>,

    /// Where to write the MP3 (defaults to speech_<code>.mp3 in the temp directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only print the localized summary, skip audio
    #[arg(long)]
    text_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    let analysis = if let Some(path) = args.file {
        println!("📖 Reading analysis: {}", path.display());
        load_analysis(&path)?
    } else {
        select_analysis()?
    };

    println!(
        "✓ Loaded analysis of {} ({} articles)",
        analysis.company,
        analysis.articles.len()
    );

    let language = match args.language {
        Some(choice) => choice.parse::<Language>()?,
        None => prompt_language()?,
    };

    println!("\n{}\n", translate_summary(&analysis, language));

    if args.text_only {
        return Ok(());
    }

    println!("🔊 Generating {} speech...", language.name());
    let synthesizer = SpeechSynthesizer::new(&config)?;
    let speech = synthesizer
        .generate_speech_for_analysis(&analysis, language, args.output)
        .await
        .context("Failed to generate speech")?;

    println!(
        "\n✅ {} speech saved to: {}",
        speech.language.name(),
        speech.audio_file.display()
    );
    println!("You can play this file using any media player.");

    Ok(())
}

fn select_analysis() -> Result<CompanyAnalysis> {
    let files = list_analysis_files()?;

    if files.is_empty() {
        anyhow::bail!("No saved analyses found. Run analyze-news first.");
    }

    println!("Available analyses:\n");
    for (i, (path, analysis)) in files.iter().enumerate() {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let created = DateTime::parse_from_rfc3339(&analysis.created_at)
            .map(|dt| {
                dt.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|_| "unknown".to_string());

        println!(
            "  {}) {} - {} (created: {})",
            i + 1,
            analysis.company,
            filename,
            created
        );
    }

    print!("\nSelect analysis (1-{}): ", files.len());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let selection: usize = input
        .trim()
        .parse()
        .context("Invalid selection. Please enter a number.")?;

    if selection < 1 || selection > files.len() {
        anyhow::bail!("Selection out of range. Please choose 1-{}", files.len());
    }

    files
        .into_iter()
        .nth(selection - 1)
        .map(|(_, analysis)| analysis)
        .context("Selection out of range")
}

fn prompt_language() -> Result<Language> {
    println!("\nSelect a language:");
    for (i, language) in Language::ALL.iter().enumerate() {
        println!("  {}) {}", i + 1, language.name());
    }
    print!("\nEnter your choice (1-{}): ", Language::ALL.len());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Language::from_choice(input.trim()).with_context(|| {
        format!(
            "Invalid selection. Please choose 1-{}.",
            Language::ALL.len()
        )
    })
}
