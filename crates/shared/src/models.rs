use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::AnalysisError;

/// Sentiment label assigned to an article by the text analyzer.
///
/// Deserialization goes through [`FromStr`], so a stored label outside the
/// three variants surfaces as a contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sentiment {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            _ => Err(AnalysisError::ContractViolation(format!(
                "unknown sentiment label '{}'",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Sentiment {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.label().to_string()
    }
}

/// A search result as scraped from the news page, before analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub link: String,
    pub summary: String,
}

/// An article after sentiment classification and topic extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedArticle {
    pub title: String,
    pub summary: String,
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
}

impl AnalyzedArticle {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        sentiment: Sentiment,
        topics: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            sentiment,
            topics,
        }
    }

    /// Build an article from a classifier that reports sentiment as text.
    pub fn from_label(
        title: impl Into<String>,
        summary: impl Into<String>,
        label: &str,
        topics: Vec<String>,
    ) -> Result<Self, AnalysisError> {
        let sentiment = label.parse()?;
        Ok(Self::new(title, summary, sentiment, topics))
    }
}

/// Article counts per sentiment. Every bucket is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn increment(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Narrative contrast between two nearby articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageDifference {
    pub comparison: String,
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicOverlap {
    /// Topics shared by at least two articles, in first-seen order
    pub common_topics: Vec<String>,
    /// Topics found in exactly one article, keyed by 1-based article index
    pub unique_topics: BTreeMap<usize, Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictKind {
    PredominantlyPositive,
    SignificantConcerns,
    CautiouslyPositive,
    LeansNegative,
    MixedOrNeutral,
}

/// Overall verdict for a batch of articles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub kind: VerdictKind,
    /// Topic the sentence is about (first topic of the first article, or a fallback)
    pub subject: String,
    pub text: String,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparativeReport {
    pub sentiment_distribution: SentimentDistribution,
    pub coverage_differences: Vec<CoverageDifference>,
    pub topic_overlap: TopicOverlap,
    pub overall_verdict: Verdict,
}

/// Complete analysis for one company, as saved to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    pub version: String,
    pub created_at: String,
    pub company: String,
    pub articles: Vec<AnalyzedArticle>,
    pub report: ComparativeReport,
}

impl CompanyAnalysis {
    pub fn new(
        company: impl Into<String>,
        articles: Vec<AnalyzedArticle>,
        report: ComparativeReport,
    ) -> Self {
        Self {
            version: "1.0".to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            company: company.into(),
            articles,
            report,
        }
    }
}
