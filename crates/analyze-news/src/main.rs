use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use shared::{
    company_slug, process_news_articles, save_analysis, BingNewsClient, Config, Language,
    LexiconAnalyzer, ReportFormatter, SpeechSynthesizer,
};
use std::io::{self as stdio, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn prompt_company() -> Result<String> {
    print!("Enter the company you want to know: ");
    stdio::stdout().flush()?;

    let mut input = String::new();
    stdio::stdin().read_line(&mut input)?;

    let company = input.trim();
    if company.is_empty() {
        anyhow::bail!("No company name given.");
    }
    Ok(company.to_string())
}

#[derive(Parser)]
#[command(name = "analyze-news")]
#[command(about = "Scrape recent news about a company and compare the sentiment of its coverage")]
struct Args {
    /// Company to search for (prompts if omitted)
    #[arg(short, long)]
    company: Option<String>,

    /// Maximum number of articles to analyze (overrides NEWS_MAX_ARTICLES)
    #[arg(short, long)]
    max_articles: Option<usize>,

    /// Also render a spoken summary in this language (code, name, or menu number 1-6)
    #[arg(short, long)]
    language: Option<String>,

    /// Write an HTML report to the Documents directory
    #[arg(long)]
    html: bool,

    /// Do not save the analysis JSON
    #[arg(long)]
    no_save: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(stdio::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env()?;

    // Validate the language before any network work
    let language = args
        .language
        .as_deref()
        .map(str::parse::<Language>)
        .transpose()?;

    let company = match args.company {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => prompt_company()?,
    };
    let limit = args.max_articles.unwrap_or(config.max_articles).max(1);

    println!("\n📰 Searching news for {}...", company);
    let client = BingNewsClient::new(&config)?;
    let raw_articles = client
        .fetch_articles(&company, limit)
        .await
        .context("Failed to fetch news articles")?;

    if raw_articles.is_empty() {
        println!("No news articles found for {}.", company);
        return Ok(());
    }

    println!("✓ Found {} articles", raw_articles.len());

    println!("\n🔍 Analyzing sentiment and topics...");
    let analysis = process_news_articles(&company, &raw_articles, &LexiconAnalyzer::new());

    print!("{}", ReportFormatter::render_text(&analysis));

    let now = Utc::now();
    let slug = company_slug(&company);

    if !args.no_save {
        let filename = format!("{}-{}.json", slug, now.format("%Y-%m-%d"));
        let filepath = save_analysis(&analysis, &filename).context("Failed to save analysis")?;
        println!("\n✓ Analysis saved to: {}", filepath.display());
    }

    if args.html {
        let html_content = ReportFormatter::generate_html(&analysis);
        let documents_dir = dirs::document_dir().unwrap_or_else(|| PathBuf::from("."));
        let html_filepath = ReportFormatter::save_html(&html_content, &documents_dir, &slug, now)
            .context("Failed to save HTML report")?;
        println!("✓ HTML report saved to: {}", html_filepath.display());
    }

    if let Some(language) = language {
        println!("\n🔊 Generating {} speech...", language.name());
        let synthesizer = SpeechSynthesizer::new(&config)?;
        let speech = synthesizer
            .generate_speech_for_analysis(&analysis, language, None)
            .await
            .context("Failed to generate speech")?;

        println!(
            "\n✅ {} speech saved to: {}",
            speech.language.name(),
            speech.audio_file.display()
        );
        println!("You can play this file using any media player.");
    }

    Ok(())
}
