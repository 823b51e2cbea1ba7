//! Text normalization, keyword extraction, and similarity scoring

use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<String>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: Self::create_stop_words(),
        }
    }

    /// Tokenize text into lower-cased words using Unicode segmentation.
    ///
    /// Stop words and tokens shorter than two characters are dropped, so
    /// empty or whitespace-only input yields an empty sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for word in text.unicode_words() {
            let normalized = word.to_lowercase();

            if normalized.chars().count() < 2 || self.stop_words.contains(&normalized) {
                continue;
            }
            if normalized.chars().any(|c| c.is_alphanumeric()) {
                tokens.push(normalized);
            }
        }

        tokens
    }

    /// Extract the `top_n` most significant keywords from text.
    ///
    /// Ranking is by descending frequency; frequency ties keep the order of
    /// first occurrence so the result is stable across runs.
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<String> {
        if top_n == 0 {
            return Vec::new();
        }

        let tokens = self.tokenize(text);
        let mut frequencies: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();

        for token in &tokens {
            let count = frequencies.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(token.as_str());
            }
            *count += 1;
        }

        let mut ranked: Vec<(usize, &str)> = first_seen
            .iter()
            .enumerate()
            .map(|(idx, token)| (idx, *token))
            .collect();
        ranked.sort_by(|a, b| {
            frequencies[b.1]
                .cmp(&frequencies[a.1])
                .then_with(|| a.0.cmp(&b.0))
        });

        ranked
            .into_iter()
            .take(top_n)
            .map(|(_, token)| token.to_string())
            .collect()
    }

    /// Calculate text similarity as Jaccard overlap of token sets, scaled
    /// to [0,100] and rounded to two decimals.
    ///
    /// Two empty token sets are defined as 0.0 similarity rather than NaN.
    /// Word order and synonymy are ignored.
    pub fn text_similarity(&self, text1: &str, text2: &str) -> f32 {
        let tokens1 = self.tokenize(text1);
        let tokens2 = self.tokenize(text2);

        let set1: HashSet<&String> = tokens1.iter().collect();
        let set2: HashSet<&String> = tokens2.iter().collect();

        let union = set1.union(&set2).count();
        if union == 0 {
            return 0.0;
        }

        let intersection = set1.intersection(&set2).count();
        round2(intersection as f32 / union as f32 * 100.0)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Common English function words excluded from matching
    fn create_stop_words() -> HashSet<String> {
        let stop_words = [
            "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any",
            "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
            "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
            "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
            "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
            "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on",
            "once", "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she",
            "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
            "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
            "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
            "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
        ];

        stop_words.iter().map(|&s| s.to_string()).collect()
    }
}

/// Round to two decimal places
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming language is awesome!");

        assert!(tokens.contains(&"rust".to_string()));
        assert!(tokens.contains(&"programming".to_string()));
        assert!(tokens.contains(&"language".to_string()));
        assert!(tokens.contains(&"awesome".to_string()));

        // Stop words should be filtered out
        assert!(!tokens.contains(&"is".to_string()));
    }

    #[test]
    fn test_tokenize_empty_input() {
        let processor = TextProcessor::new();
        assert!(processor.tokenize("").is_empty());
        assert!(processor.tokenize("   \n\t  ").is_empty());
    }

    #[test]
    fn test_keyword_extraction_frequency_ranking() {
        let processor = TextProcessor::new();
        let text = "Rust Rust programming language. Rust keeps memory safe. Programming fun.";

        let keywords = processor.extract_keywords(text, 5);

        assert!(keywords.len() <= 5);
        assert_eq!(keywords[0], "rust");
        assert_eq!(keywords[1], "programming");
    }

    #[test]
    fn test_keyword_extraction_stable_tie_break() {
        let processor = TextProcessor::new();
        // Every token appears exactly once, so ranking must follow first occurrence
        let keywords = processor.extract_keywords("python docker kubernetes terraform", 10);
        assert_eq!(keywords, vec!["python", "docker", "kubernetes", "terraform"]);
    }

    #[test]
    fn test_keyword_extraction_filters_stopwords() {
        let processor = TextProcessor::new();
        let keywords =
            processor.extract_keywords("I am a software engineer with experience in Python", 10);

        assert!(!keywords.contains(&"i".to_string()));
        assert!(!keywords.contains(&"am".to_string()));
        assert!(!keywords.contains(&"a".to_string()));
        assert!(keywords.contains(&"python".to_string()));
    }

    #[test]
    fn test_keyword_extraction_degenerate_inputs() {
        let processor = TextProcessor::new();
        assert!(processor.extract_keywords("", 10).is_empty());
        assert!(processor.extract_keywords("Python", 0).is_empty());
        assert!(processor.extract_keywords("Python", 10).len() <= 1);
    }

    #[test]
    fn test_similarity_symmetry() {
        let processor = TextProcessor::new();
        let text1 = "Rust programming language";
        let text2 = "Programming with Python language";

        assert_eq!(
            processor.text_similarity(text1, text2),
            processor.text_similarity(text2, text1)
        );
    }

    #[test]
    fn test_similarity_identity() {
        let processor = TextProcessor::new();
        let text = "Python JavaScript React developer";
        assert_eq!(processor.text_similarity(text, text), 100.0);
    }

    #[test]
    fn test_similarity_empty_case() {
        let processor = TextProcessor::new();
        assert_eq!(processor.text_similarity("", ""), 0.0);
    }

    #[test]
    fn test_similarity_bounded() {
        let processor = TextProcessor::new();
        let similarity =
            processor.text_similarity("Python JavaScript React", "Python cooking gardening");
        assert!(similarity > 0.0);
        assert!(similarity < 100.0);
    }
}
