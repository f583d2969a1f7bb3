use rust_stemmers::{Algorithm, Stemmer};

use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;

pub struct StemmerFilter {
    algorithm: Algorithm,
}

impl StemmerFilter {
    pub fn new(algorithm: Algorithm) -> Self {
        StemmerFilter { algorithm }
    }

    pub fn english() -> Self {
        StemmerFilter::new(Algorithm::English)
    }
}

impl TokenFilter for StemmerFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        let stemmer = Stemmer::create(self.algorithm);
        tokens
            .into_iter()
            .map(|mut token| {
                token.text = stemmer.stem(&token.text).to_string();
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "stemmer"
    }
}

/// Chinese word segments are already index-ready; stemming is a no-op.
pub struct IdentityFilter;

impl TokenFilter for IdentityFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
    }

    fn name(&self) -> &str {
        "identity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_stemmer_reduces_to_root() {
        let filter = StemmerFilter::english();
        let tokens = vec![Token::new("jumping".into(), 0), Token::new("flies".into(), 1)];
        let stemmed = filter.filter(tokens);
        assert_eq!(stemmed[0].text, "jump");
    }
}
