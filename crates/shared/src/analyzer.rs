//! Per-article sentiment classification and topic extraction.
//!
//! The comparison stage only needs a sentiment label and a short topic list
//! per article, so the analyzer sits behind the [`TextAnalyzer`] trait. The
//! default [`LexiconAnalyzer`] is rule based and shares one read-only lexicon
//! across the whole process.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::models::Sentiment;

const DEFAULT_MAX_TOPICS: usize = 3;

/// Polarity and compound thresholds for a non-neutral verdict
const POLARITY_THRESHOLD: f64 = 0.1;
const COMPOUND_THRESHOLD: f64 = 0.05;

/// Normalisation constant for the compound score
const COMPOUND_ALPHA: f64 = 15.0;

const FREQUENT_KEYWORDS: usize = 5;

/// Non-sentiment tokens a negation can skip before it lapses
const NEGATION_REACH: usize = 3;

const CLAUSE_PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '?'];

static DEFAULT_LEXICON: Lazy<SentimentLexicon> = Lazy::new(SentimentLexicon::news);

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "even", "few", "for", "from", "further", "had", "has", "have",
        "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
        "however", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "last",
        "least", "less", "like", "made", "make", "many", "may", "me", "meanwhile", "might",
        "more", "most", "much", "must", "my", "myself", "new", "news", "no", "nor", "not",
        "now", "of", "off", "on", "once", "one", "only", "or", "other", "our", "ours",
        "ourselves", "out", "over", "own", "said", "same", "says", "she", "should", "since",
        "so", "some", "still", "such", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
        "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
        "which", "while", "who", "whom", "why", "will", "with", "would", "year", "years",
        "yet", "you", "your", "yours", "yourself", "yourselves", "according", "already",
        "amid", "another", "around", "back", "could", "first", "get", "gets", "going",
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
        "today", "week", "across", "within", "without", "would", "report", "reports",
    ]
    .into_iter()
    .collect()
});

/// Topics that are never worth reporting on their own
const SKIPPED_TOPICS: [&str; 7] = ["the", "this", "that", "these", "those", "already", "an"];

/// Classifies a piece of article text.
///
/// Implementations must be deterministic and must only ever return one of
/// the three sentiment variants.
pub trait TextAnalyzer {
    fn sentiment(&self, text: &str) -> Sentiment;
    fn topics(&self, text: &str) -> Vec<String>;
}

/// Word-level sentiment lexicon with negation and intensifier handling
pub struct SentimentLexicon {
    words: HashMap<String, f64>,
    negations: HashSet<String>,
    intensifiers: HashMap<String, f64>,
}

impl SentimentLexicon {
    /// Lexicon tuned for business news headlines and snippets
    pub fn news() -> Self {
        let positive_words = [
            ("gain", 0.5),
            ("growth", 0.6),
            ("grow", 0.5),
            ("profit", 0.6),
            ("profitable", 0.6),
            ("surge", 0.7),
            ("soar", 0.8),
            ("rally", 0.7),
            ("rise", 0.5),
            ("jump", 0.5),
            ("climb", 0.4),
            ("beat", 0.6),
            ("exceed", 0.6),
            ("outperform", 0.7),
            ("record", 0.5),
            ("strong", 0.5),
            ("robust", 0.6),
            ("boost", 0.6),
            ("improve", 0.5),
            ("improvement", 0.5),
            ("success", 0.7),
            ("successful", 0.7),
            ("win", 0.6),
            ("innovative", 0.6),
            ("innovation", 0.5),
            ("breakthrough", 0.7),
            ("launch", 0.3),
            ("expand", 0.4),
            ("expansion", 0.4),
            ("partnership", 0.4),
            ("upgrade", 0.5),
            ("optimistic", 0.6),
            ("confident", 0.5),
            ("positive", 0.5),
            ("good", 0.5),
            ("great", 0.7),
            ("excellent", 0.8),
            ("best", 0.7),
            ("leading", 0.4),
            ("popular", 0.5),
            ("praise", 0.6),
            ("recover", 0.5),
            ("recovery", 0.5),
            ("rebound", 0.5),
            ("approve", 0.5),
            ("approval", 0.5),
            ("award", 0.6),
            ("milestone", 0.5),
            ("opportunity", 0.4),
            ("benefit", 0.5),
            ("celebrate", 0.6),
            ("upbeat", 0.6),
            ("bullish", 0.7),
        ];

        let negative_words = [
            ("loss", -0.6),
            ("lose", -0.5),
            ("decline", -0.6),
            ("drop", -0.6),
            ("fall", -0.5),
            ("plunge", -0.8),
            ("slump", -0.7),
            ("crash", -0.9),
            ("tumble", -0.7),
            ("sink", -0.6),
            ("miss", -0.5),
            ("weak", -0.5),
            ("concern", -0.5),
            ("worry", -0.5),
            ("fear", -0.6),
            ("risk", -0.4),
            ("uncertainty", -0.5),
            ("recall", -0.6),
            ("lawsuit", -0.6),
            ("sue", -0.6),
            ("fine", -0.4),
            ("penalty", -0.6),
            ("probe", -0.5),
            ("investigation", -0.5),
            ("fraud", -0.9),
            ("scandal", -0.8),
            ("layoff", -0.7),
            ("cut", -0.4),
            ("crisis", -0.8),
            ("warn", -0.5),
            ("warning", -0.5),
            ("fail", -0.7),
            ("failure", -0.7),
            ("problem", -0.5),
            ("trouble", -0.6),
            ("delay", -0.4),
            ("ban", -0.5),
            ("criticism", -0.6),
            ("criticize", -0.6),
            ("controversy", -0.6),
            ("downgrade", -0.6),
            ("bad", -0.6),
            ("poor", -0.6),
            ("worst", -0.8),
            ("negative", -0.5),
            ("struggle", -0.6),
            ("threat", -0.6),
            ("halt", -0.5),
            ("strike", -0.5),
            ("bankruptcy", -0.9),
            ("debt", -0.3),
            ("bearish", -0.7),
            ("slowdown", -0.5),
        ];

        let words = positive_words
            .into_iter()
            .chain(negative_words)
            .map(|(word, score)| (word.to_string(), score))
            .collect();

        let negations = [
            "not", "no", "never", "neither", "nobody", "nothing", "none", "cannot", "cant",
            "can't", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't", "wont",
            "isn't", "isnt", "aren't", "arent", "wasn't", "wasnt", "hardly", "barely", "without",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let intensifiers = [
            ("very", 1.5),
            ("extremely", 2.0),
            ("highly", 1.5),
            ("significantly", 1.5),
            ("sharply", 1.6),
            ("dramatically", 1.8),
            ("massively", 1.8),
            ("slightly", 0.5),
            ("somewhat", 0.7),
            ("marginally", 0.5),
        ]
        .into_iter()
        .map(|(word, mult)| (word.to_string(), mult))
        .collect();

        Self {
            words,
            negations,
            intensifiers,
        }
    }

    /// Process-wide lexicon, built on first use
    pub fn shared() -> &'static SentimentLexicon {
        &DEFAULT_LEXICON
    }

    /// Score for a word, falling back to a few suffix-stripped forms
    pub fn score(&self, word: &str) -> Option<f64> {
        let word = word.to_lowercase();
        if let Some(score) = self.words.get(&word) {
            return Some(*score);
        }
        ["s", "es", "ed", "d", "ing", "ly"]
            .iter()
            .filter_map(|suffix| word.strip_suffix(suffix))
            .find_map(|stem| self.words.get(stem).copied())
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(&word.to_lowercase())
    }

    pub fn intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(&word.to_lowercase()).copied()
    }

    /// Score a text: negation flips the next sentiment word within a few
    /// tokens of the same clause, intensifiers scale the word right after them.
    pub fn analyze(&self, text: &str) -> LexiconScore {
        let mut scores = Vec::new();
        let mut negation_reach = 0;
        let mut intensifier = 1.0;

        for token in text.split_whitespace() {
            let ends_clause = token.ends_with(CLAUSE_PUNCTUATION);

            if let Some(word) = clean_word(token) {
                if self.is_negation(word) {
                    negation_reach = NEGATION_REACH;
                } else if let Some(mult) = self.intensifier(word) {
                    intensifier = mult;
                } else {
                    if let Some(mut score) = self.score(word) {
                        if negation_reach > 0 {
                            score = -score;
                            negation_reach = 0;
                        }
                        scores.push(score * intensifier);
                    } else {
                        negation_reach = negation_reach.saturating_sub(1);
                    }
                    intensifier = 1.0;
                }
            }

            if ends_clause {
                negation_reach = 0;
                intensifier = 1.0;
            }
        }

        let sum: f64 = scores.iter().sum();
        let polarity = if scores.is_empty() {
            0.0
        } else {
            (sum / scores.len() as f64).clamp(-1.0, 1.0)
        };
        let compound = sum / (sum * sum + COMPOUND_ALPHA).sqrt();

        LexiconScore {
            polarity,
            compound,
            matched: scores.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconScore {
    /// Mean score of matched words, in [-1, 1]
    pub polarity: f64,
    /// Sum of matched scores squashed into (-1, 1)
    pub compound: f64,
    pub matched: usize,
}

impl LexiconScore {
    pub fn sentiment(&self) -> Sentiment {
        if self.polarity > POLARITY_THRESHOLD || self.compound > COMPOUND_THRESHOLD {
            Sentiment::Positive
        } else if self.polarity < -POLARITY_THRESHOLD || self.compound < -COMPOUND_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Default analyzer backed by the shared news lexicon
pub struct LexiconAnalyzer {
    lexicon: &'static SentimentLexicon,
    max_topics: usize,
}

impl Default for LexiconAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self {
            lexicon: SentimentLexicon::shared(),
            max_topics: DEFAULT_MAX_TOPICS,
        }
    }

    pub fn with_max_topics(mut self, max_topics: usize) -> Self {
        self.max_topics = max_topics;
        self
    }
}

impl TextAnalyzer for LexiconAnalyzer {
    fn sentiment(&self, text: &str) -> Sentiment {
        self.lexicon.analyze(text).sentiment()
    }

    fn topics(&self, text: &str) -> Vec<String> {
        extract_topics(text, self.max_topics)
    }
}

/// Split text into words, trimming surrounding punctuation.
fn clean_word(token: &str) -> Option<&str> {
    let word = token
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .trim_matches('\'');
    (!word.is_empty()).then_some(word)
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace().filter_map(clean_word)
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word.to_lowercase().as_str())
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

fn flush_phrase(current: &mut Vec<&str>, phrases: &mut Vec<String>) {
    while current.first().is_some_and(|w| is_stopword(w)) {
        current.remove(0);
    }
    while current.last().is_some_and(|w| is_stopword(w)) {
        current.pop();
    }
    if !current.is_empty() {
        phrases.push(current.join(" "));
    }
    current.clear();
}

/// Runs of capitalised words, e.g. "Tesla Cybertruck" or "European Union".
///
/// A run stops at punctuation. Leading and trailing stopwords are dropped so
/// sentence-initial "The" does not end up in a topic.
fn capitalized_phrases(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for raw in text.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '&');
        if word.is_empty() {
            flush_phrase(&mut current, &mut phrases);
            continue;
        }

        if starts_uppercase(word) {
            current.push(word);
        } else {
            flush_phrase(&mut current, &mut phrases);
        }

        let ends_clause = raw
            .chars()
            .last()
            .is_some_and(|c| matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | ')' | '"'));
        if ends_clause {
            flush_phrase(&mut current, &mut phrases);
        }
    }
    flush_phrase(&mut current, &mut phrases);

    phrases
}

/// Most frequent content words, ties broken by first appearance.
fn frequent_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for word in words(text) {
        if word.chars().count() <= 3 || !word.chars().all(|c| c.is_alphabetic()) {
            continue;
        }
        let lower = word.to_lowercase();
        if is_stopword(&lower) {
            continue;
        }
        let count = counts.entry(lower.clone()).or_insert(0);
        if *count == 0 {
            order.push(lower);
        }
        *count += 1;
    }

    // Stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.truncate(limit);
    order
}

/// Capitalise the first letter of every word and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if previous_is_letter {
            result.extend(c.to_lowercase());
        } else {
            result.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }
    result
}

fn clean_topic(candidate: &str) -> Option<String> {
    let topic = title_case(candidate.trim());
    let lower = topic.to_lowercase();

    if topic.chars().count() < 4 || SKIPPED_TOPICS.contains(&lower.as_str()) {
        return None;
    }

    let topic = ["a ", "an ", "the "]
        .iter()
        .find(|article| lower.starts_with(*article))
        .map(|article| topic[article.len()..].to_string())
        .unwrap_or(topic);

    if topic.chars().count() > 3 {
        Some(topic)
    } else {
        None
    }
}

/// Extract up to `max_topics` topics, most specific candidates first.
pub fn extract_topics(text: &str, max_topics: usize) -> Vec<String> {
    let mut topics = Vec::new();
    let mut seen = HashSet::new();

    let candidates = capitalized_phrases(text)
        .into_iter()
        .chain(frequent_keywords(text, FREQUENT_KEYWORDS));

    for candidate in candidates {
        if let Some(topic) = clean_topic(&candidate) {
            if seen.insert(topic.to_lowercase()) {
                topics.push(topic);
            }
        }
    }

    if topics.is_empty() && !text.trim().is_empty() {
        for word in words(text) {
            if starts_uppercase(word) && word.chars().count() > 3 && seen.insert(word.to_lowercase())
            {
                topics.push(title_case(word));
                if topics.len() >= max_topics {
                    break;
                }
            }
        }
    }

    topics.truncate(max_topics);
    topics
}
