// Public modules
pub mod analyzer;
pub mod comparison;
pub mod config;
pub mod error;
pub mod io;
pub mod language;
pub mod models;
pub mod news;
pub mod pipeline;
pub mod report;
pub mod speech;

// Re-export commonly used types
pub use analyzer::{LexiconAnalyzer, TextAnalyzer};
pub use comparison::compare_articles;
pub use config::Config;
pub use error::AnalysisError;
pub use io::{get_default_analyses_dir, list_analysis_files, load_analysis, save_analysis};
pub use language::{translate_summary, translate_verdict, Language};
pub use models::{
    AnalyzedArticle, CompanyAnalysis, ComparativeReport, RawArticle, Sentiment, Verdict,
    VerdictKind,
};
pub use news::BingNewsClient;
pub use pipeline::process_news_articles;
pub use report::{company_slug, ReportFormatter};
pub use speech::{SpeechOutput, SpeechSynthesizer};
