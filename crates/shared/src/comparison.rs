//! Cross-article comparison: sentiment tally, topic overlap, coverage
//! differences and the overall verdict.
//!
//! Everything here is a pure function of the ordered article list. The same
//! input always yields the same report.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::models::{
    AnalyzedArticle, ComparativeReport, CoverageDifference, Sentiment, SentimentDistribution,
    TopicOverlap, Verdict, VerdictKind,
};

/// Subject used in narrative sentences when an article has no topics
pub const FALLBACK_SUBJECT: &str = "the company";

/// Each article is compared with at most this many following articles
const COMPARISON_WINDOW: usize = 2;

const MAX_COVERAGE_DIFFERENCES: usize = 3;

const TITLE_PREVIEW_CHARS: usize = 40;

/// Build the full comparative report for an ordered batch of articles.
pub fn compare_articles(articles: &[AnalyzedArticle]) -> ComparativeReport {
    let sentiment_distribution = sentiment_distribution(articles);
    let coverage_differences = coverage_differences(articles);
    let topic_overlap = topic_overlap(articles);
    let overall_verdict = overall_verdict(
        &sentiment_distribution,
        articles.first().map(|a| a.topics.as_slice()),
    );

    debug!(
        articles = articles.len(),
        differences = coverage_differences.len(),
        common_topics = topic_overlap.common_topics.len(),
        verdict = ?overall_verdict.kind,
        "Built comparative report"
    );

    ComparativeReport {
        sentiment_distribution,
        coverage_differences,
        topic_overlap,
        overall_verdict,
    }
}

/// Count articles per sentiment.
///
/// Sentiment is a closed enum, so every article lands in exactly one bucket.
/// Malformed labels are rejected earlier, when the article is built.
pub fn sentiment_distribution(articles: &[AnalyzedArticle]) -> SentimentDistribution {
    let mut distribution = SentimentDistribution::default();
    for article in articles {
        distribution.increment(article.sentiment);
    }
    distribution
}

struct TopicTally {
    display: String,
    articles: usize,
}

fn topic_key(topic: &str) -> String {
    topic.to_lowercase()
}

/// Compute shared and per-article unique topics.
///
/// Topic identity is case-insensitive; the casing shown for a common topic
/// is the first one seen. A topic repeated inside a single article still
/// counts once for that article.
pub fn topic_overlap(articles: &[AnalyzedArticle]) -> TopicOverlap {
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, TopicTally> = HashMap::new();

    for article in articles {
        let mut seen_in_article = HashSet::new();
        for topic in &article.topics {
            let key = topic_key(topic);
            if !seen_in_article.insert(key.clone()) {
                continue;
            }
            match tallies.get_mut(&key) {
                Some(tally) => tally.articles += 1,
                None => {
                    order.push(key.clone());
                    tallies.insert(
                        key,
                        TopicTally {
                            display: topic.clone(),
                            articles: 1,
                        },
                    );
                }
            }
        }
    }

    let common_topics = order
        .iter()
        .filter_map(|key| tallies.get(key))
        .filter(|tally| tally.articles >= 2)
        .map(|tally| tally.display.clone())
        .collect();

    let mut unique_topics = BTreeMap::new();
    for (index, article) in articles.iter().enumerate() {
        let mut seen_in_article = HashSet::new();
        let unique: Vec<String> = article
            .topics
            .iter()
            .filter(|topic| {
                let key = topic_key(topic);
                seen_in_article.insert(key.clone())
                    && tallies.get(&key).map(|t| t.articles) == Some(1)
            })
            .cloned()
            .collect();
        unique_topics.insert(index + 1, unique);
    }

    TopicOverlap {
        common_topics,
        unique_topics,
    }
}

/// Index pairs `(i, j)` of sentiment-contrasting articles that get a
/// coverage-difference entry.
///
/// Article `i` is only compared with the next two articles, and the list is
/// cut at the first three pairs in scan order.
pub fn contrasting_pairs(articles: &[AnalyzedArticle]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let n = articles.len();

    for i in 0..n {
        let last = (i + COMPARISON_WINDOW).min(n.saturating_sub(1));
        for j in (i + 1)..=last {
            if articles[i].sentiment == articles[j].sentiment {
                continue;
            }
            pairs.push((i, j));
            if pairs.len() == MAX_COVERAGE_DIFFERENCES {
                return pairs;
            }
        }
    }

    pairs
}

pub fn coverage_differences(articles: &[AnalyzedArticle]) -> Vec<CoverageDifference> {
    contrasting_pairs(articles)
        .into_iter()
        .map(|(i, j)| coverage_difference(&articles[i], &articles[j]))
        .collect()
}

fn coverage_difference(first: &AnalyzedArticle, second: &AnalyzedArticle) -> CoverageDifference {
    let comparison = format!(
        "Article '{}' has {} sentiment, while '{}' has {} sentiment.",
        preview_title(&first.title),
        first.sentiment.label().to_lowercase(),
        preview_title(&second.title),
        second.sentiment.label().to_lowercase()
    );

    CoverageDifference {
        comparison,
        impact: impact_statement(first, second),
    }
}

/// Shorten a title to 40 characters, appending "..." when it was cut.
pub fn preview_title(title: &str) -> String {
    if title.chars().count() > TITLE_PREVIEW_CHARS {
        let head: String = title.chars().take(TITLE_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}

fn join_topics<'a>(topics: impl IntoIterator<Item = &'a String>) -> String {
    topics
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Impact sentence for a contrasting pair, chosen by the ordered sentiment pair.
pub fn impact_statement(first: &AnalyzedArticle, second: &AnalyzedArticle) -> String {
    match (first.sentiment, second.sentiment) {
        (Sentiment::Positive, Sentiment::Negative) => format!(
            "The positive news about {} is offset by concerns regarding {}.",
            join_topics(first.topics.iter().take(2)),
            join_topics(second.topics.iter().take(2))
        ),
        (Sentiment::Negative, Sentiment::Positive) => format!(
            "While there are concerns about {}, positive developments in {} may balance the overall impact.",
            join_topics(first.topics.iter().take(2)),
            join_topics(second.topics.iter().take(2))
        ),
        _ => {
            // Lead topic of each side, without case-insensitive duplicates
            let mut seen = HashSet::new();
            let leads: Vec<&String> = first
                .topics
                .first()
                .into_iter()
                .chain(second.topics.first())
                .filter(|topic| seen.insert(topic_key(topic)))
                .collect();
            format!(
                "The articles present different perspectives on {}.",
                join_topics(leads)
            )
        }
    }
}

/// Pick the verdict category. Guards are evaluated top to bottom and the
/// first match wins; ties fall through to `MixedOrNeutral`.
pub fn classify_verdict(distribution: &SentimentDistribution) -> VerdictKind {
    let SentimentDistribution {
        positive,
        negative,
        neutral,
    } = *distribution;

    match () {
        _ if positive > negative + neutral => VerdictKind::PredominantlyPositive,
        _ if negative > positive + neutral => VerdictKind::SignificantConcerns,
        _ if positive > negative => VerdictKind::CautiouslyPositive,
        _ if negative > positive => VerdictKind::LeansNegative,
        _ => VerdictKind::MixedOrNeutral,
    }
}

/// English verdict sentence for a category and subject.
pub fn verdict_sentence(kind: VerdictKind, subject: &str) -> String {
    match kind {
        VerdictKind::PredominantlyPositive => format!(
            "Coverage is predominantly positive. Positive news about {} is particularly noteworthy.",
            subject
        ),
        VerdictKind::SignificantConcerns => format!(
            "Coverage shows significant concerns, particularly regarding {}.",
            subject
        ),
        VerdictKind::CautiouslyPositive => format!(
            "Coverage is cautiously positive, with some concerns noted about {}.",
            subject
        ),
        VerdictKind::LeansNegative => format!(
            "Coverage leans negative, though there are some positive developments in {}.",
            subject
        ),
        VerdictKind::MixedOrNeutral => format!(
            "Coverage is mixed or neutral, with balanced perspectives on {}.",
            subject
        ),
    }
}

/// Overall verdict from the distribution and the first article's topics.
pub fn overall_verdict(
    distribution: &SentimentDistribution,
    first_article_topics: Option<&[String]>,
) -> Verdict {
    let kind = classify_verdict(distribution);
    let subject = first_article_topics
        .and_then(|topics| topics.first())
        .cloned()
        .unwrap_or_else(|| FALLBACK_SUBJECT.to_string());
    let text = verdict_sentence(kind, &subject);

    Verdict {
        kind,
        subject,
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn article(title: &str, sentiment: Sentiment, topics: &[&str]) -> AnalyzedArticle {
        AnalyzedArticle::new(
            title,
            format!("Summary of {}", title),
            sentiment,
            topics.iter().map(|t| t.to_string()).collect(),
        )
    }

    fn dist(positive: usize, negative: usize, neutral: usize) -> SentimentDistribution {
        SentimentDistribution {
            positive,
            negative,
            neutral,
        }
    }

    // ==================== Scenario Tests ====================

    #[test]
    fn test_mixed_batch_with_shared_topic() {
        let articles = vec![
            article("Tesla beats delivery estimates", Sentiment::Positive, &["Tesla"]),
            article("New battery plant opens", Sentiment::Positive, &["Tesla", "Battery"]),
            article("Regulators order recall", Sentiment::Negative, &["Recall"]),
        ];

        let report = compare_articles(&articles);

        assert_eq!(report.sentiment_distribution, dist(2, 1, 0));
        assert_eq!(report.topic_overlap.common_topics, vec!["Tesla".to_string()]);
        assert_eq!(report.overall_verdict.kind, VerdictKind::PredominantlyPositive);
        assert_eq!(
            report.overall_verdict.text,
            "Coverage is predominantly positive. Positive news about Tesla is particularly noteworthy."
        );
    }

    #[test]
    fn test_empty_batch() {
        let report = compare_articles(&[]);

        assert_eq!(report.sentiment_distribution, dist(0, 0, 0));
        assert!(report.topic_overlap.common_topics.is_empty());
        assert!(report.topic_overlap.unique_topics.is_empty());
        assert!(report.coverage_differences.is_empty());
        assert_eq!(report.overall_verdict.kind, VerdictKind::MixedOrNeutral);
        assert_eq!(report.overall_verdict.subject, "the company");
        assert_eq!(
            report.overall_verdict.text,
            "Coverage is mixed or neutral, with balanced perspectives on the company."
        );
    }

    #[test]
    fn test_all_neutral_batch() {
        let articles: Vec<_> = (0..5)
            .map(|i| article(&format!("Story {}", i), Sentiment::Neutral, &["Market"]))
            .collect();

        let report = compare_articles(&articles);

        assert_eq!(report.overall_verdict.kind, VerdictKind::MixedOrNeutral);
        assert!(report.coverage_differences.is_empty());
        assert_eq!(report.sentiment_distribution.neutral, 5);
    }

    #[test]
    fn test_negative_then_positive_pair() {
        let articles = vec![
            article("Layoffs hit factory", Sentiment::Negative, &["Layoffs", "Factory"]),
            article("Record quarterly profit", Sentiment::Positive, &["Profit", "Revenue"]),
        ];

        let report = compare_articles(&articles);

        assert_eq!(report.coverage_differences.len(), 1);
        let diff = &report.coverage_differences[0];
        assert_eq!(
            diff.comparison,
            "Article 'Layoffs hit factory' has negative sentiment, while 'Record quarterly profit' has positive sentiment."
        );
        assert_eq!(
            diff.impact,
            "While there are concerns about Layoffs, Factory, positive developments in Profit, Revenue may balance the overall impact."
        );
    }

    // ==================== Topic Overlap Tests ====================

    #[test]
    fn test_topic_overlap_is_case_insensitive_and_keeps_first_casing() {
        let articles = vec![
            article("A", Sentiment::Neutral, &["Electric Vehicles", "Musk"]),
            article("B", Sentiment::Neutral, &["electric vehicles", "Tariffs"]),
            article("C", Sentiment::Neutral, &["TARIFFS"]),
        ];

        let overlap = topic_overlap(&articles);

        assert_eq!(
            overlap.common_topics,
            vec!["Electric Vehicles".to_string(), "Tariffs".to_string()]
        );
        assert_eq!(overlap.unique_topics[&1], vec!["Musk".to_string()]);
        assert!(overlap.unique_topics[&2].is_empty());
        assert!(overlap.unique_topics[&3].is_empty());
    }

    #[test]
    fn test_topic_overlap_keeps_article_order_for_unique_topics() {
        let articles = vec![
            article("A", Sentiment::Positive, &["Zeta", "Alpha", "Shared"]),
            article("B", Sentiment::Positive, &["Shared"]),
        ];

        let overlap = topic_overlap(&articles);

        assert_eq!(
            overlap.unique_topics[&1],
            vec!["Zeta".to_string(), "Alpha".to_string()]
        );
    }

    #[test]
    fn test_topic_overlap_repeated_topic_within_one_article_is_not_common() {
        let articles = vec![
            article("A", Sentiment::Positive, &["Chips", "chips"]),
            article("B", Sentiment::Positive, &["Cloud"]),
        ];

        let overlap = topic_overlap(&articles);

        assert!(overlap.common_topics.is_empty());
        assert_eq!(overlap.unique_topics[&1], vec!["Chips".to_string()]);
    }

    #[test]
    fn test_topic_overlap_article_without_topics_still_has_entry() {
        let articles = vec![
            article("A", Sentiment::Positive, &[]),
            article("B", Sentiment::Negative, &["Lawsuit"]),
        ];

        let overlap = topic_overlap(&articles);

        assert_eq!(overlap.unique_topics.len(), 2);
        assert!(overlap.unique_topics[&1].is_empty());
    }

    // ==================== Coverage Difference Tests ====================

    #[test]
    fn test_pairs_use_sliding_window_of_two() {
        let articles = vec![
            article("A", Sentiment::Positive, &[]),
            article("B", Sentiment::Positive, &[]),
            article("C", Sentiment::Positive, &[]),
            article("D", Sentiment::Negative, &[]),
        ];

        // A-D is three apart and must not be compared
        assert_eq!(contrasting_pairs(&articles), vec![(1, 3), (2, 3)]);
    }

    #[test]
    fn test_pairs_truncate_to_first_three() {
        let sentiments = [
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Positive,
            Sentiment::Negative,
        ];
        let articles: Vec<_> = sentiments
            .iter()
            .enumerate()
            .map(|(i, s)| article(&format!("Article {}", i), *s, &[]))
            .collect();

        assert_eq!(contrasting_pairs(&articles), vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(coverage_differences(&articles).len(), 3);
    }

    #[test]
    fn test_positive_then_negative_impact() {
        let first = article("Up", Sentiment::Positive, &["Sales", "Margins", "Outlook"]);
        let second = article("Down", Sentiment::Negative, &["Recall"]);

        assert_eq!(
            impact_statement(&first, &second),
            "The positive news about Sales, Margins is offset by concerns regarding Recall."
        );
    }

    #[test]
    fn test_generic_impact_deduplicates_lead_topics() {
        let first = article("Flat", Sentiment::Neutral, &["Tesla", "Battery"]);
        let second = article("Down", Sentiment::Negative, &["tesla", "Recall"]);

        assert_eq!(
            impact_statement(&first, &second),
            "The articles present different perspectives on Tesla."
        );

        let third = article("Up", Sentiment::Positive, &["Robotaxi"]);
        assert_eq!(
            impact_statement(&first, &third),
            "The articles present different perspectives on Tesla, Robotaxi."
        );
    }

    #[test]
    fn test_impact_without_topics_leaves_list_empty() {
        let first = article("Up", Sentiment::Positive, &[]);
        let second = article("Down", Sentiment::Negative, &["Recall"]);

        assert_eq!(
            impact_statement(&first, &second),
            "The positive news about  is offset by concerns regarding Recall."
        );

        let flat = article("Flat", Sentiment::Neutral, &[]);
        assert_eq!(
            impact_statement(&first, &flat),
            "The articles present different perspectives on ."
        );
    }

    #[test]
    fn test_preview_title_truncates_long_titles() {
        let long = "A".repeat(45);
        assert_eq!(preview_title(&long), format!("{}...", "A".repeat(40)));
        assert_eq!(preview_title("Short title"), "Short title");
        assert_eq!(preview_title(&"B".repeat(40)), "B".repeat(40));
    }

    #[test]
    fn test_preview_title_counts_characters_not_bytes() {
        let title = "é".repeat(41);
        assert_eq!(preview_title(&title), format!("{}...", "é".repeat(40)));
    }

    // ==================== Verdict Tests ====================

    #[test]
    fn test_verdict_ladder() {
        assert_eq!(classify_verdict(&dist(3, 1, 1)), VerdictKind::PredominantlyPositive);
        assert_eq!(classify_verdict(&dist(0, 2, 1)), VerdictKind::SignificantConcerns);
        assert_eq!(classify_verdict(&dist(2, 1, 1)), VerdictKind::CautiouslyPositive);
        assert_eq!(classify_verdict(&dist(1, 2, 1)), VerdictKind::LeansNegative);
        assert_eq!(classify_verdict(&dist(2, 2, 0)), VerdictKind::MixedOrNeutral);
        assert_eq!(classify_verdict(&dist(0, 0, 0)), VerdictKind::MixedOrNeutral);
    }

    #[test]
    fn test_verdict_boundary_majority_requires_strict_excess() {
        // 2 positive vs 1 negative + 1 neutral is not a strict majority
        assert_eq!(classify_verdict(&dist(2, 1, 1)), VerdictKind::CautiouslyPositive);
        assert_eq!(classify_verdict(&dist(1, 0, 0)), VerdictKind::PredominantlyPositive);
    }

    #[test]
    fn test_verdict_two_positive_one_negative_is_predominantly_positive() {
        // Majority check runs before the plain positive > negative rung
        assert_eq!(classify_verdict(&dist(2, 1, 0)), VerdictKind::PredominantlyPositive);
        assert_eq!(classify_verdict(&dist(1, 2, 0)), VerdictKind::SignificantConcerns);
    }

    #[test]
    fn test_verdict_uses_fallback_for_empty_first_topics() {
        let verdict = overall_verdict(&dist(0, 3, 0), Some(&[] as &[String]));
        assert_eq!(
            verdict.text,
            "Coverage shows significant concerns, particularly regarding the company."
        );
    }

    #[test]
    fn test_verdict_templates() {
        let topics = vec!["Apple".to_string()];
        assert_eq!(
            overall_verdict(&dist(3, 0, 0), Some(topics.as_slice())).text,
            "Coverage is predominantly positive. Positive news about Apple is particularly noteworthy."
        );
        assert_eq!(
            overall_verdict(&dist(1, 2, 1), Some(topics.as_slice())).text,
            "Coverage leans negative, though there are some positive developments in Apple."
        );
    }

    // ==================== Property Tests ====================

    fn sentiment_strategy() -> impl Strategy<Value = Sentiment> {
        prop_oneof![
            Just(Sentiment::Positive),
            Just(Sentiment::Negative),
            Just(Sentiment::Neutral),
        ]
    }

    fn topics_strategy() -> impl Strategy<Value = Vec<String>> {
        let pool = vec!["Tesla", "tesla", "Battery", "Recall", "RECALL", "Musk", "Tariffs"];
        prop::collection::vec(prop::sample::select(pool), 0..4).prop_map(|picked| {
            let mut seen = HashSet::new();
            picked
                .into_iter()
                .filter(|t| seen.insert(t.to_lowercase()))
                .map(String::from)
                .collect()
        })
    }

    fn articles_strategy() -> impl Strategy<Value = Vec<AnalyzedArticle>> {
        prop::collection::vec(
            ("[A-Za-z ]{0,60}", sentiment_strategy(), topics_strategy()).prop_map(
                |(title, sentiment, topics)| AnalyzedArticle::new(title, "", sentiment, topics),
            ),
            0..12,
        )
    }

    fn articles_with_topic(articles: &[AnalyzedArticle], topic: &str) -> Vec<usize> {
        articles
            .iter()
            .enumerate()
            .filter(|(_, a)| a.topics.iter().any(|t| t.to_lowercase() == topic.to_lowercase()))
            .map(|(i, _)| i + 1)
            .collect()
    }

    proptest! {
        #[test]
        fn prop_distribution_sums_to_article_count(articles in articles_strategy()) {
            let report = compare_articles(&articles);
            prop_assert_eq!(report.sentiment_distribution.total(), articles.len());
        }

        #[test]
        fn prop_overlap_is_consistent(articles in articles_strategy()) {
            let overlap = topic_overlap(&articles);

            for topic in &overlap.common_topics {
                prop_assert!(articles_with_topic(&articles, topic).len() >= 2);
            }
            for (index, topics) in &overlap.unique_topics {
                for topic in topics {
                    prop_assert_eq!(articles_with_topic(&articles, topic), vec![*index]);
                }
            }
            prop_assert_eq!(overlap.unique_topics.len(), articles.len());
        }

        #[test]
        fn prop_pairs_respect_window_and_truncation(articles in articles_strategy()) {
            let pairs = contrasting_pairs(&articles);
            prop_assert!(pairs.len() <= 3);
            for (i, j) in pairs {
                prop_assert!(i < j && j - i <= 2);
                prop_assert_ne!(articles[i].sentiment, articles[j].sentiment);
            }
            prop_assert!(compare_articles(&articles).coverage_differences.len() <= 3);
        }

        #[test]
        fn prop_report_is_deterministic(articles in articles_strategy()) {
            prop_assert_eq!(compare_articles(&articles), compare_articles(&articles));
        }

        #[test]
        fn prop_verdict_is_idempotent(p in 0usize..20, n in 0usize..20, u in 0usize..20) {
            let topics = vec!["Nvidia".to_string()];
            let first = overall_verdict(&dist(p, n, u), Some(topics.as_slice()));
            let second = overall_verdict(&dist(p, n, u), Some(topics.as_slice()));
            prop_assert_eq!(first, second);
        }
    }
}
