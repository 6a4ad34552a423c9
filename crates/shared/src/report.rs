use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{CompanyAnalysis, Sentiment};

pub struct ReportFormatter;

impl ReportFormatter {
    fn format_date(date_str: &str) -> String {
        if let Ok(dt) = date_str.parse::<DateTime<Utc>>() {
            return dt.format("%-d-%b-%Y %-I:%M%p").to_string();
        }
        date_str.to_string()
    }

    /// Console report for one analysis
    pub fn render_text(analysis: &CompanyAnalysis) -> String {
        let report = &analysis.report;
        let mut out = String::new();

        out.push_str(&format!("\nAnalysis Results for {}:\n\n", analysis.company));

        out.push_str("News Articles:\n");
        for (index, article) in analysis.articles.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, article.title));
            out.push_str(&format!("   Summary: {}\n", article.summary));
            out.push_str(&format!("   Sentiment: {}\n", article.sentiment));
            out.push_str(&format!("   Topics: {}\n", article.topics.join(", ")));
            out.push_str("---\n");
        }

        out.push_str("\nSentiment Distribution:\n");
        for sentiment in Sentiment::ALL {
            out.push_str(&format!(
                "   {}: {}\n",
                sentiment,
                report.sentiment_distribution.count(sentiment)
            ));
        }

        out.push_str("\nCoverage Differences:\n");
        for difference in &report.coverage_differences {
            out.push_str(&format!("   - {}\n", difference.comparison));
            out.push_str(&format!("     Impact: {}\n", difference.impact));
        }

        out.push_str("\nTopic Overlap:\n");
        if report.topic_overlap.common_topics.is_empty() {
            out.push_str("   Common Topics: None\n");
        } else {
            out.push_str(&format!(
                "   Common Topics: {}\n",
                report.topic_overlap.common_topics.join(", ")
            ));
        }

        out.push_str("\nFinal Sentiment Analysis:\n");
        out.push_str(&format!("   {}\n", report.overall_verdict));

        out
    }

    pub fn generate_html(analysis: &CompanyAnalysis) -> String {
        let report = &analysis.report;
        let company = Self::escape_html(&analysis.company);
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\">\n");
        html.push_str(&format!("  <title>{} News Analysis</title>\n", company));
        html.push_str("  <style>\n");
        html.push_str("    body { font-family: Arial, sans-serif; max-width: 900px; margin: 40px auto; padding: 0 20px; line-height: 1.6; }\n");
        html.push_str("    h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; text-align: center; }\n");
        html.push_str("    h1 .date { display: block; font-size: 0.6em; font-weight: normal; color: #555; }\n");
        html.push_str("    h2 { color: #34495e; padding: 10px; background-color: #ecf0f1; border-left: 4px solid #3498db; }\n");
        html.push_str("    h3 { color: #2c3e50; margin-top: 25px; }\n");
        html.push_str("    .article { margin: 15px 0; padding: 10px; background-color: #f8f9fa; border-radius: 4px; }\n");
        html.push_str("    .metadata { color: #7f8c8d; font-size: 0.9em; margin: 5px 0; }\n");
        html.push_str("    .positive { color: #27ae60; font-weight: bold; }\n");
        html.push_str("    .negative { color: #c0392b; font-weight: bold; }\n");
        html.push_str("    .neutral { color: #7f8c8d; font-weight: bold; }\n");
        html.push_str("    .verdict { font-size: 1.1em; padding: 15px; border: 2px solid #3498db; border-radius: 4px; }\n");
        html.push_str("    ul { margin: 10px 0; padding-left: 20px; }\n");
        html.push_str("    li { margin: 8px 0; }\n");
        html.push_str("  </style>\n");
        html.push_str("</head>\n<body>\n");

        html.push_str(&format!(
            "<h1>{} News Analysis<span class=\"date\">Prepared {}</span></h1>\n",
            company,
            Self::format_date(&analysis.created_at)
        ));

        // Verdict first, details below
        html.push_str("<h2>Final Sentiment Analysis</h2>\n");
        html.push_str(&format!(
            "<p class=\"verdict\">{}</p>\n",
            Self::escape_html(&report.overall_verdict.text)
        ));

        html.push_str("<h2>Sentiment Distribution</h2>\n<ul>\n");
        for sentiment in Sentiment::ALL {
            html.push_str(&format!(
                "  <li><span class=\"{}\">{}</span>: {}</li>\n",
                Self::sentiment_class(sentiment),
                sentiment,
                report.sentiment_distribution.count(sentiment)
            ));
        }
        html.push_str("</ul>\n");

        html.push_str("<h2>Coverage Differences</h2>\n");
        if report.coverage_differences.is_empty() {
            html.push_str("<p class=\"metadata\">No contrasting coverage found.</p>\n");
        } else {
            html.push_str("<ul>\n");
            for difference in &report.coverage_differences {
                html.push_str(&format!(
                    "  <li>{}<br><em>Impact:</em> {}</li>\n",
                    Self::escape_html(&difference.comparison),
                    Self::escape_html(&difference.impact)
                ));
            }
            html.push_str("</ul>\n");
        }

        html.push_str("<h2>Topic Overlap</h2>\n");
        let common = if report.topic_overlap.common_topics.is_empty() {
            "None".to_string()
        } else {
            Self::escape_html(&report.topic_overlap.common_topics.join(", "))
        };
        html.push_str(&format!("<p><strong>Common Topics:</strong> {}</p>\n", common));

        html.push_str("<h2>Articles</h2>\n");
        for (index, article) in analysis.articles.iter().enumerate() {
            html.push_str("<div class=\"article\">\n");
            html.push_str(&format!(
                "  <h3>{}. {}</h3>\n",
                index + 1,
                Self::escape_html(&article.title)
            ));
            html.push_str("  <div class=\"metadata\">\n");
            html.push_str(&format!(
                "    <strong>Sentiment:</strong> <span class=\"{}\">{}</span><br>\n",
                Self::sentiment_class(article.sentiment),
                article.sentiment
            ));
            html.push_str(&format!(
                "    <strong>Topics:</strong> {}\n",
                Self::escape_html(&article.topics.join(", "))
            ));
            html.push_str("  </div>\n");
            html.push_str(&format!("  <p>{}</p>\n", Self::escape_html(&article.summary)));
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>");
        html
    }

    fn sentiment_class(sentiment: Sentiment) -> &'static str {
        match sentiment {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    pub fn save_html(content: &str, dir: &Path, slug: &str, date: DateTime<Utc>) -> Result<PathBuf> {
        let filename = format!("{}-{}.html", slug, date.format("%Y-%m-%d"));
        let filepath = dir.join(&filename);

        fs::write(&filepath, content).context("Failed to write HTML report")?;

        Ok(filepath)
    }
}

/// Filename-safe form of a company name: "AT&T Inc." becomes "at-t-inc"
pub fn company_slug(name: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "company".to_string()
    } else {
        slug
    }
}
