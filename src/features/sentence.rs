//! Average sentence length feature.

use super::traits::FeatureExtractor;

/// Mean number of words per sentence.
///
/// Sentences end at runs of `.`, `!` or `?`. Fragments without words are
/// ignored; a passage without words scores `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageSentenceLength;

impl FeatureExtractor for AverageSentenceLength {
    fn name(&self) -> &'static str {
        "avg_sentence_len"
    }

    fn evaluate(&self, context: &str) -> f64 {
        let (sentences, words) = context
            .split(['.', '!', '?'])
            .map(|s| s.split_whitespace().count())
            .filter(|&n| n > 0)
            .fold((0usize, 0usize), |(s, w), n| (s + 1, w + n));

        if sentences == 0 {
            0.0
        } else {
            words as f64 / sentences as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_over_sentences() {
        let f = AverageSentenceLength;
        assert_eq!(f.evaluate("The cat sat."), 3.0);
        assert_eq!(f.evaluate("The cat sat. A cat sat on a mat."), 4.5);
        assert_eq!(f.evaluate("Really?! Yes."), 1.0);
    }

    #[test]
    fn unterminated_tail_counts_as_sentence() {
        assert_eq!(AverageSentenceLength.evaluate("one two. three"), 1.5);
    }

    #[test]
    fn empty_input_is_zero() {
        let f = AverageSentenceLength;
        assert_eq!(f.evaluate(""), 0.0);
        assert_eq!(f.evaluate(" ... !? "), 0.0);
    }
}
