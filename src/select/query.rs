//! Path query language
//!
//! A query is a list of terms evaluated against a root-relative path:
//! - terms are OR-ed together
//! - a term prefixed with `!` is a veto: if it is satisfied the path is rejected
//! - `#` splits a term into sections that must all be satisfied (AND)
//! - `,` splits a section into words, any of which may match (OR)
//!
//! Words match as case-insensitive substrings of the whole path.

/// Negation marker at the start of a term
pub const NEGATION_MARKER: char = '!';

/// Separator between sections of a term
pub const SECTION_SEPARATOR: char = '#';

/// Separator between words of a section
pub const WORD_SEPARATOR: char = ',';

/// A group of alternative words; satisfied when any word is a substring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    words: Vec<String>,
}

impl Section {
    fn parse(raw: &str) -> Self {
        let words = split_trimmed(raw, WORD_SEPARATOR)
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    #[allow(dead_code)]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn is_satisfied(&self, path: &str) -> bool {
        self.words.iter().any(|w| path.contains(w.as_str()))
    }
}

/// One OR-branch of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    negated: bool,
    sections: Vec<Section>,
}

impl Term {
    /// Parse a raw term such as `!rock#live,unplugged`
    pub fn parse(raw: &str) -> Self {
        let (negated, body) = match raw.strip_prefix(NEGATION_MARKER) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let sections = split_trimmed(body, SECTION_SEPARATOR)
            .map(Section::parse)
            .collect();

        Self { negated, sections }
    }

    #[allow(dead_code)]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    #[allow(dead_code)]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Every section must be satisfied; no sections is vacuously true.
    fn is_satisfied(&self, path: &str) -> bool {
        self.sections.iter().all(|s| s.is_satisfied(path))
    }
}

/// A parsed term list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<Term>,
}

impl Query {
    pub fn parse<S: AsRef<str>>(terms: &[S]) -> Self {
        Self {
            terms: terms.iter().map(|t| Term::parse(t.as_ref())).collect(),
        }
    }

    #[allow(dead_code)]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate the query against an already lowercased path.
    ///
    /// Single left-to-right pass: a satisfied positive term only marks the
    /// path as passing, a satisfied negated term rejects it on the spot.
    pub fn matches(&self, normalized_path: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }

        let mut passed = false;

        for term in &self.terms {
            if !term.is_satisfied(normalized_path) {
                continue;
            }

            if term.negated {
                return false;
            }

            passed = true;
        }

        passed
    }

    /// Normalize `path` and evaluate the query against it
    pub fn matches_path(&self, path: &str) -> bool {
        self.matches(&normalize_candidate(path))
    }
}

/// Case normalization applied once per candidate before matching
pub fn normalize_candidate(path: &str) -> String {
    path.to_lowercase()
}

/// Parse `terms` and test a single path
#[allow(dead_code)]
pub fn matches<S: AsRef<str>>(terms: &[S], path: &str) -> bool {
    Query::parse(terms).matches_path(path)
}

/// Split on `sep`, dropping whitespace that directly follows a separator
fn split_trimmed(s: &str, sep: char) -> impl Iterator<Item = &str> {
    s.split(sep)
        .enumerate()
        .map(|(i, part)| if i == 0 { part } else { part.trim_start() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_TERMS: [&str; 0] = [];

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(matches(&NO_TERMS, "anything/at/all.mp3"));
        assert!(matches(&NO_TERMS, ""));
        assert!(Query::default().is_empty());
    }

    #[test]
    fn test_word_is_case_insensitive_substring() {
        assert!(matches(&["drum"], "Drums/Kick.wav"));
        assert!(matches(&["DRUM"], "drums/kick.wav"));
        assert!(matches(&["guitar"], "unguitarred/riff.mp3"));
        assert!(!matches(&["bass"], "drums/kick.wav"));
    }

    #[test]
    fn test_sections_are_anded() {
        assert!(matches(&["rock#live"], "rock/live/track1.m4a"));
        assert!(!matches(&["rock#live"], "rock/studio/track1.m4a"));
    }

    #[test]
    fn test_words_are_ored() {
        assert!(matches(&["rock,jazz"], "jazz/track1.m4a"));
        assert!(matches(&["rock,jazz"], "rock/track1.m4a"));
        assert!(!matches(&["rock,jazz"], "blues/track1.m4a"));
    }

    #[test]
    fn test_whitespace_after_separators_is_trimmed() {
        let term = Term::parse("rock, jazz# live");
        assert_eq!(term.sections().len(), 2);
        assert_eq!(term.sections()[0].words(), ["rock", "jazz"]);
        assert_eq!(term.sections()[1].words(), ["live"]);
        assert!(matches(&["rock, jazz# live"], "jazz/live/a.mp3"));
    }

    #[test]
    fn test_negation_vetoes_positive_match() {
        assert!(!matches(&["rock", "!live"], "rock/live/show.m4a"));
        assert!(matches(&["rock", "!live"], "rock/studio/show.m4a"));
    }

    #[test]
    fn test_veto_wins_regardless_of_order() {
        let path = "rock/live/show.m4a";
        assert!(!matches(&["!live", "rock"], path));
        assert!(!matches(&["rock", "!live"], path));
        assert!(!matches(&["rock", "!live", "show"], path));
    }

    #[test]
    fn test_only_negated_terms_never_pass() {
        // No positive term can set the pass flag
        assert!(!matches(&["!live"], "rock/studio/a.mp3"));
        assert!(!matches(&["!live"], "rock/live/a.mp3"));
    }

    #[test]
    fn test_negated_term_with_sections() {
        let terms = ["rock", "!live#2019"];
        assert!(matches(&terms, "rock/live/2020/a.mp3"));
        assert!(!matches(&terms, "rock/live/2019/a.mp3"));
    }

    #[test]
    fn test_no_positive_term_satisfied() {
        assert!(!matches(&["jazz", "blues"], "rock/a.mp3"));
    }

    #[test]
    fn test_parse_negation_marker() {
        let term = Term::parse("!live");
        assert!(term.is_negated());
        assert_eq!(term.sections()[0].words(), ["live"]);

        let term = Term::parse("live!");
        assert!(!term.is_negated());
    }

    #[test]
    fn test_empty_bodies_do_not_crash() {
        // An empty word is a substring of every path
        assert!(matches(&[""], "rock/a.mp3"));
        assert!(matches(&["rock#"], "rock/a.mp3"));
        assert!(!matches(&["!"], "rock/a.mp3"));
    }

    #[test]
    fn test_words_are_lowercased_at_parse_time() {
        let query = Query::parse(&["ROCK#Live"]);
        assert_eq!(query.terms()[0].sections()[0].words(), ["rock"]);
        assert!(query.matches("rock/live/a.mp3"));
    }

    #[test]
    fn test_matches_expects_normalized_input() {
        let query = Query::parse(&["rock"]);
        assert!(!query.matches("Rock/A.mp3"));
        assert!(query.matches_path("Rock/A.mp3"));
    }
}
