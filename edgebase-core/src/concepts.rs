//! Frequency-based key-concept extraction.
//!
//! Deliberately crude: tokens are lower-cased whitespace-separated words with
//! punctuation left attached, and a "key concept" is any token seen more than once.

use std::collections::HashMap;

/// Return every token that occurs more than once, in order of first occurrence.
pub fn extract_key_concepts(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in lowered.split_whitespace() {
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter(|word| counts.get(word).copied().unwrap_or(0) > 1)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_token_is_concept() {
        assert_eq!(extract_key_concepts("a a b"), vec!["a"]);
    }

    #[test]
    fn test_no_repeats_yields_nothing() {
        assert!(extract_key_concepts("a b c").is_empty());
        assert!(extract_key_concepts("").is_empty());
        assert!(extract_key_concepts("   \n\t ").is_empty());
    }

    #[test]
    fn test_case_folded_and_punctuation_kept() {
        let text = "Python is a programming language. Python is widely used in data science.";
        let concepts = extract_key_concepts(text);
        assert_eq!(concepts, vec!["python", "is"]);
    }

    #[test]
    fn test_order_is_first_occurrence_not_frequency() {
        let concepts = extract_key_concepts("b a a a b c c");
        assert_eq!(concepts, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_punctuation_distinguishes_tokens() {
        assert!(extract_key_concepts("end end. end!").is_empty());
    }
}
