use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::Token;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Splits on Unicode word boundaries and lowercases; used for English
/// (and any other space-delimited script).
#[derive(Clone, Default)]
pub struct StandardTokenizer;

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.unicode_words()
            .enumerate()
            .map(|(position, word)| Token::new(word.to_lowercase(), position as u32))
            .collect()
    }

    fn name(&self) -> &str {
        "standard"
    }
}

/// Segments simplified Chinese with a dictionary-based word breaker,
/// since there is no whitespace to split on.
#[cfg(feature = "tokenizer-jieba")]
pub struct ChineseTokenizer {
    jieba: jieba_rs::Jieba,
}

#[cfg(feature = "tokenizer-jieba")]
impl ChineseTokenizer {
    pub fn new() -> Self {
        ChineseTokenizer { jieba: jieba_rs::Jieba::new() }
    }
}

#[cfg(feature = "tokenizer-jieba")]
impl Default for ChineseTokenizer {
    fn default() -> Self {
        ChineseTokenizer::new()
    }
}

#[cfg(feature = "tokenizer-jieba")]
impl Tokenizer for ChineseTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        self.jieba
            .cut(text, false)
            .into_iter()
            .map(str::trim)
            .filter(|word| !word.is_empty() && word.chars().any(|c| !c.is_whitespace()))
            .enumerate()
            .map(|(position, word)| Token::new(word.to_string(), position as u32))
            .collect()
    }

    fn name(&self) -> &str {
        "chinese"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tokenizer_lowercases_and_splits() {
        let tokens = StandardTokenizer.tokenize("The Quick Brown Fox");
        assert_eq!(
            tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            vec!["the", "quick", "brown", "fox"]
        );
    }

    #[cfg(feature = "tokenizer-jieba")]
    #[test]
    fn chinese_tokenizer_segments_without_whitespace() {
        let tokens = ChineseTokenizer::new().tokenize("我爱北京天安门");
        assert!(!tokens.is_empty());
        assert!(tokens.iter().all(|t| !t.text.trim().is_empty()));
    }
}
