/// Ordered list of image candidates, split into the source tried first and
/// the fallbacks to advance through on load failure.
///
/// An empty list yields no source; the image is left unset.
#[derive(Debug, Clone)]
pub struct PosterChain<'a> {
    candidates: &'a [String],
}

impl<'a> PosterChain<'a> {
    /// Build a chain over `candidates`, preferred first.
    pub fn new(candidates: &'a [String]) -> Self {
        Self { candidates }
    }

    /// Source attached first, if any.
    pub fn current(&self) -> Option<&'a str> {
        self.candidates.first().map(String::as_str)
    }

    /// Candidates tried, in order, after the first one fails.
    pub fn remaining(&self) -> &'a [String] {
        self.candidates.get(1..).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_first_candidate_from_fallbacks() {
        let candidates = vec!["a.png".to_string(), "b.png".to_string()];
        let chain = PosterChain::new(&candidates);
        assert_eq!(chain.current(), Some("a.png"));
        assert_eq!(chain.remaining(), &candidates[1..]);

        let single = vec!["only.png".to_string()];
        let chain = PosterChain::new(&single);
        assert_eq!(chain.current(), Some("only.png"));
        assert!(chain.remaining().is_empty());
    }

    #[test]
    fn empty_chain_attaches_nothing() {
        let chain = PosterChain::new(&[]);
        assert_eq!(chain.current(), None);
        assert!(chain.remaining().is_empty());
    }
}
