use std::collections::HashSet;

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

pub struct StopWordFilter {
    stop_words: HashSet<String>,
}

impl StopWordFilter {
    pub fn new(stop_words: Vec<String>) -> Self {
        StopWordFilter { stop_words: stop_words.into_iter().collect() }
    }

    pub fn english() -> Self {
        StopWordFilter::new(
            [
                "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in",
                "is", "it", "its", "of", "on", "that", "the", "to", "was", "were", "will", "with",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }

    pub fn simplified_chinese() -> Self {
        StopWordFilter::new(
            ["的", "了", "和", "是", "在", "我", "有", "他", "这", "中", "一个", "也", "就", "那"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }
}

impl TokenFilter for StopWordFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter().filter(|token| !self.stop_words.contains(&token.text)).collect()
    }

    fn name(&self) -> &str {
        "stop_words"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_filter_drops_listed_words() {
        let filter = StopWordFilter::english();
        let tokens = vec![Token::new("the".into(), 0), Token::new("fox".into(), 1)];
        let kept = filter.filter(tokens);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "fox");
    }
}
