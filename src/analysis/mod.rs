pub mod filter;
pub mod filters;
pub mod token;
pub mod tokenizer;

use crate::core::types::{Concordance, Language};
use filter::TokenFilter;
use filters::stemmer::{IdentityFilter, StemmerFilter};
use filters::stopword::StopWordFilter;
use tokenizer::{StandardTokenizer, Tokenizer};

#[cfg(feature = "tokenizer-jieba")]
use tokenizer::ChineseTokenizer;

/// Runs the tokenize -> stop-word -> stem chain for one language and
/// folds the surviving tokens into a term-frequency map. Built once per
/// language and reused by both the ingest pipeline's tokenizer/stemmer
/// stages and the synchronous query path, so the two can never drift
/// out of step with each other.
pub struct Analyzer {
    tokenizer: Box<dyn Tokenizer>,
    filters: Vec<Box<dyn TokenFilter>>,
}

impl Analyzer {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Analyzer {
                tokenizer: Box::new(StandardTokenizer),
                filters: vec![Box::new(StopWordFilter::english()), Box::new(StemmerFilter::english())],
            },
            Language::SimplifiedChinese => Analyzer {
                tokenizer: Self::chinese_tokenizer(),
                filters: vec![Box::new(StopWordFilter::simplified_chinese()), Box::new(IdentityFilter)],
            },
        }
    }

    #[cfg(feature = "tokenizer-jieba")]
    fn chinese_tokenizer() -> Box<dyn Tokenizer> {
        Box::new(ChineseTokenizer::new())
    }

    #[cfg(not(feature = "tokenizer-jieba"))]
    fn chinese_tokenizer() -> Box<dyn Tokenizer> {
        Box::new(StandardTokenizer)
    }

    /// Tokenizes `text`, runs it through the stop-word and stemming
    /// filters in order, and counts surviving terms into a concordance.
    pub fn analyze(&self, text: &str) -> Concordance {
        let mut tokens = self.tokenizer.tokenize(text);
        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }
        let mut concordance = Concordance::new();
        for token in tokens {
            if token.text.is_empty() {
                continue;
            }
            *concordance.entry(token.text).or_insert(0) += 1;
        }
        concordance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_analyzer_strips_stop_words_and_stems() {
        let analyzer = Analyzer::for_language(Language::English);
        let concordance = analyzer.analyze("the flies are flying over the flies");
        assert_eq!(concordance.get("fli").copied(), Some(3));
        assert!(!concordance.contains_key("the"));
        assert!(!concordance.contains_key("are"));
    }

    #[test]
    fn chinese_analyzer_drops_stop_words() {
        let analyzer = Analyzer::for_language(Language::SimplifiedChinese);
        let concordance = analyzer.analyze("北京是中国的首都");
        assert!(!concordance.contains_key("的"));
        assert!(!concordance.is_empty());
    }
}
