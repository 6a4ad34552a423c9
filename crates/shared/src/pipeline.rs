use tracing::{debug, info};

use crate::analyzer::TextAnalyzer;
use crate::comparison::compare_articles;
use crate::models::{AnalyzedArticle, CompanyAnalysis, RawArticle};
use crate::news::NO_SUMMARY;

const UNTITLED: &str = "Untitled";

/// Classify every article, compare them, and wrap the result for one company.
pub fn process_news_articles<A: TextAnalyzer>(
    company: &str,
    raw_articles: &[RawArticle],
    analyzer: &A,
) -> CompanyAnalysis {
    let articles: Vec<AnalyzedArticle> = raw_articles
        .iter()
        .map(|raw| analyze_article(raw, analyzer))
        .collect();

    let report = compare_articles(&articles);

    info!(
        company,
        articles = articles.len(),
        verdict = ?report.overall_verdict.kind,
        "Analyzed company news"
    );

    CompanyAnalysis::new(company, articles, report)
}

fn analyze_article<A: TextAnalyzer>(raw: &RawArticle, analyzer: &A) -> AnalyzedArticle {
    let title = if raw.title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        raw.title.clone()
    };
    let summary = if raw.summary.trim().is_empty() {
        NO_SUMMARY.to_string()
    } else {
        raw.summary.clone()
    };

    let sentiment = analyzer.sentiment(&summary);
    let topics = analyzer.topics(&summary);
    debug!(%title, %sentiment, ?topics, "Classified article");

    AnalyzedArticle::new(title, summary, sentiment, topics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::LexiconAnalyzer;
    use crate::models::{Sentiment, VerdictKind};

    /// Classifies by keyword so tests control the outcome exactly
    struct KeywordAnalyzer;

    impl TextAnalyzer for KeywordAnalyzer {
        fn sentiment(&self, text: &str) -> Sentiment {
            if text.contains("good") {
                Sentiment::Positive
            } else if text.contains("bad") {
                Sentiment::Negative
            } else {
                Sentiment::Neutral
            }
        }

        fn topics(&self, text: &str) -> Vec<String> {
            text.split_whitespace()
                .filter(|w| w.starts_with('#'))
                .map(|w| w.trim_start_matches('#').to_string())
                .collect()
        }
    }

    fn raw(title: &str, summary: &str) -> RawArticle {
        RawArticle {
            title: title.to_string(),
            link: "https://example.com".to_string(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_process_assembles_analysis() {
        let raws = vec![
            raw("One", "good #Tesla"),
            raw("Two", "good #Tesla #Battery"),
            raw("Three", "bad #Recall"),
        ];

        let analysis = process_news_articles("Tesla", &raws, &KeywordAnalyzer);

        assert_eq!(analysis.company, "Tesla");
        assert_eq!(analysis.version, "1.0");
        assert_eq!(analysis.articles.len(), 3);
        assert_eq!(analysis.articles[1].topics, vec!["Tesla", "Battery"]);
        assert_eq!(analysis.report.topic_overlap.common_topics, vec!["Tesla"]);
        assert_eq!(
            analysis.report.overall_verdict.kind,
            VerdictKind::PredominantlyPositive
        );
    }

    #[test]
    fn test_process_fills_missing_title_and_summary() {
        let raws = vec![raw("  ", "")];

        let analysis = process_news_articles("Acme", &raws, &KeywordAnalyzer);

        assert_eq!(analysis.articles[0].title, "Untitled");
        assert_eq!(analysis.articles[0].summary, "No summary available");
        assert_eq!(analysis.articles[0].sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_process_empty_input() {
        let analysis = process_news_articles("Acme", &[], &KeywordAnalyzer);

        assert!(analysis.articles.is_empty());
        assert_eq!(analysis.report.sentiment_distribution.total(), 0);
        assert_eq!(analysis.report.overall_verdict.subject, "the company");
    }

    #[test]
    fn test_process_with_lexicon_analyzer() {
        let raws = vec![
            raw("Surge", "Tesla shares surge after record profit"),
            raw("Recall", "Tesla faces recall investigation over brake problems"),
        ];

        let analysis = process_news_articles("Tesla", &raws, &LexiconAnalyzer::new());

        assert_eq!(analysis.articles[0].sentiment, Sentiment::Positive);
        assert_eq!(analysis.articles[1].sentiment, Sentiment::Negative);
        assert_eq!(analysis.report.coverage_differences.len(), 1);
        assert!(analysis
            .report
            .topic_overlap
            .common_topics
            .contains(&"Tesla".to_string()));
    }
}
