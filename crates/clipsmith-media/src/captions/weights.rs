//! Per-word display-weight model.
//!
//! A word's weight determines its share of the segment duration. All
//! factors are multiplicative, so application order does not matter.

/// Short function words that read quickly.
const COMMON_WORDS: [&str; 35] = [
    "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "be", "been", "to", "of",
    "in", "on", "at", "by", "for", "with", "it", "its", "this", "that", "as", "so", "if", "then",
    "than", "not", "no", "do", "does", "did", "have",
];

/// Words a viewer should dwell on.
const EMPHASIS_WORDS: [&str; 15] = [
    "never",
    "always",
    "must",
    "huge",
    "massive",
    "incredible",
    "insane",
    "crazy",
    "unbelievable",
    "important",
    "critical",
    "every",
    "absolutely",
    "literally",
    "completely",
];

/// Attention vocabulary for hook styling.
const HOOK_WORDS: [&str; 15] = [
    "amazing",
    "shocking",
    "secret",
    "revealed",
    "truth",
    "mistake",
    "warning",
    "stop",
    "wait",
    "listen",
    "imagine",
    "crazy",
    "insane",
    "unbelievable",
    "finally",
];

/// Lowercase a word and strip non-alphanumeric characters.
pub fn clean_word(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Approximate syllable count by counting vowels, minimum 1.
pub fn estimate_syllables(word: &str) -> u32 {
    let vowels = word
        .chars()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .count() as u32;
    vowels.max(1)
}

/// Compute the display weight of one word token.
pub fn word_weight(word: &str) -> f64 {
    let mut weight = 1.0;

    // Longer words take longer to read
    weight *= 0.7 + (word.chars().count() as f64 / 5.0) * 0.6;

    // More syllables, more dwell time
    weight *= 0.8 + estimate_syllables(word) as f64 * 0.15;

    // Sentence-final punctuation earns a pause
    if word.ends_with(['.', '!', '?', ';']) {
        weight *= 1.4;
    } else if word.ends_with([',', ':']) {
        weight *= 1.2;
    }

    let cleaned = clean_word(word);
    if COMMON_WORDS.contains(&cleaned.as_str()) {
        weight *= 0.7;
    }
    if EMPHASIS_WORDS.contains(&cleaned.as_str()) {
        weight *= 1.3;
    }
    if word.chars().any(|c| c.is_ascii_digit()) {
        weight *= 1.2;
    }

    weight
}

/// Whether a word belongs to the hook vocabulary.
pub fn is_hook_word(word: &str) -> bool {
    HOOK_WORDS.contains(&clean_word(word).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_word() {
        assert_eq!(clean_word("Hello,"), "hello");
        assert_eq!(clean_word("WAIT!"), "wait");
        assert_eq!(clean_word("it's"), "its");
    }

    #[test]
    fn test_syllable_estimate() {
        assert_eq!(estimate_syllables("cat"), 1);
        assert_eq!(estimate_syllables("audio"), 4);
        // No vowels still counts as one syllable
        assert_eq!(estimate_syllables("hmm"), 1);
    }

    #[test]
    fn test_common_words_are_lighter() {
        assert!(word_weight("the") < word_weight("thunder"));
    }

    #[test]
    fn test_emphasis_words_are_heavier() {
        // Same length, one emphasized
        assert!(word_weight("never") > word_weight("lever"));
    }

    #[test]
    fn test_punctuation_factors() {
        let plain = word_weight("done");
        assert!((word_weight("done.") / plain - 1.4 * weight_ratio("done.", "done")).abs() < 0.2);
        assert!(word_weight("done.") > word_weight("done,"));
        assert!(word_weight("done,") > plain);
    }

    #[test]
    fn test_digits_are_heavier() {
        assert!(word_weight("500") > word_weight("abc"));
    }

    #[test]
    fn test_hook_vocabulary() {
        assert!(is_hook_word("Shocking!"));
        assert!(is_hook_word("secret"));
        assert!(!is_hook_word("ordinary"));
    }

    // Ratio of the punctuation-independent factors of two tokens.
    fn weight_ratio(a: &str, b: &str) -> f64 {
        let len_a = 0.7 + (a.chars().count() as f64 / 5.0) * 0.6;
        let len_b = 0.7 + (b.chars().count() as f64 / 5.0) * 0.6;
        len_a / len_b
    }
}
