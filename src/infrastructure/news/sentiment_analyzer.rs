//! Local NLP-based sentiment scoring using VADER
//!
//! Headlines and summaries are scored with the VADER (Valence Aware
//! Dictionary and sEntiment Reasoner) compound score. An optional equity
//! keyword boost nudges the score for market jargon VADER's general lexicon
//! does not weigh.
//!
//! # Example
//! ```rust,ignore
//! use stocknews::domain::ports::SentimentScorer;
//! use stocknews::infrastructure::news::sentiment_analyzer::VaderSentimentScorer;
//!
//! let scorer = VaderSentimentScorer::new();
//! let score = scorer.score("Apple posts record profit, shares rally");
//! assert!(score > 0.0);
//! ```

use crate::domain::ports::SentimentScorer;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Equity keywords and their boost. Only applied when boosting is enabled.
const BULLISH_KEYWORDS: &[(&str, f64)] = &[
    ("beats estimates", 0.4),
    ("beat estimates", 0.4),
    ("tops estimates", 0.4),
    ("raises guidance", 0.5),
    ("upgrade", 0.3),
    ("upgraded", 0.3),
    ("outperform", 0.3),
    ("surge", 0.4),
    ("surges", 0.4),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("soar", 0.5),
    ("soars", 0.5),
    ("record high", 0.4),
    ("all-time high", 0.5),
    ("buyback", 0.2),
    ("dividend hike", 0.3),
    ("bullish", 0.5),
];

const BEARISH_KEYWORDS: &[(&str, f64)] = &[
    ("misses estimates", -0.4),
    ("missed estimates", -0.4),
    ("cuts guidance", -0.5),
    ("downgrade", -0.3),
    ("downgraded", -0.3),
    ("underperform", -0.3),
    ("plunge", -0.5),
    ("plunges", -0.5),
    ("tumble", -0.4),
    ("tumbles", -0.4),
    ("sell-off", -0.4),
    ("selloff", -0.4),
    ("lawsuit", -0.4),
    ("recall", -0.3),
    ("probe", -0.3),
    ("layoffs", -0.3),
    ("bankruptcy", -0.6),
    ("bearish", -0.5),
];

/// VADER compound scorer, optionally boosted with equity keywords.
pub struct VaderSentimentScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
    financial_boost: bool,
}

impl VaderSentimentScorer {
    /// Plain VADER compound score.
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
            financial_boost: false,
        }
    }

    pub fn with_financial_boost(financial_boost: bool) -> Self {
        Self {
            financial_boost,
            ..Self::new()
        }
    }

    fn keyword_boost(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();

        BULLISH_KEYWORDS
            .iter()
            .chain(BEARISH_KEYWORDS)
            .filter(|(keyword, _)| text_lower.contains(keyword))
            .map(|(_, score)| score)
            .sum()
    }
}

impl Default for VaderSentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderSentimentScorer {
    /// Score between -1.0 and 1.0; blank text scores 0.0.
    fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let compound = self.analyzer.polarity_scores(text)["compound"];
        if !self.financial_boost {
            return compound;
        }

        (compound + self.keyword_boost(text) * 0.5).clamp(-1.0, 1.0)
    }
}
