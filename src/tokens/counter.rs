//! Token counter implementations.

pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    fn count_all<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> usize
    where
        Self: Sized,
    {
        texts.into_iter().map(|t| self.count(t)).sum()
    }
}

/// `ceil(chars / chars_per_token)`, counting Unicode scalar values.
#[derive(Debug, Clone)]
pub struct CharacterEstimator {
    chars_per_token: f64,
}

impl CharacterEstimator {
    pub fn new() -> Self {
        Self::with_ratio(4.0)
    }

    /// Non-positive ratios fall back to 4.
    pub fn with_ratio(r: f64) -> Self {
        let chars_per_token = if r.is_finite() && r > 0.0 { r } else { 4.0 };
        Self { chars_per_token }
    }
}

impl Default for CharacterEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for CharacterEstimator {
    fn count(&self, text: &str) -> usize {
        let chars = text.chars().count();
        (chars as f64 / self.chars_per_token).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_up_quarter_of_length() {
        let c = CharacterEstimator::new();
        assert_eq!(c.count("Hello world"), 3);
        assert_eq!(c.count(""), 0);
        assert_eq!(c.count("abcd"), 1);
        assert_eq!(c.count("abcde"), 2);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let c = CharacterEstimator::new();
        assert_eq!(c.count("日本語です"), 2);
    }

    #[test]
    fn custom_ratio_and_sum() {
        let c = CharacterEstimator::with_ratio(2.0);
        assert_eq!(c.count_all(["abc", "de"]), 3);
        assert_eq!(CharacterEstimator::with_ratio(0.0).count("abcd"), 1);
    }
}
