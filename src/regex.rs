use std::sync::Arc;

use log::debug;

use crate::{
    error::Error,
    nfa::{compiler, Config, NFA},
    pikevm::PikeVM,
    syntax,
    util::{
        captures::{Captures, GroupInfo, Slot},
        search::{Match, Span},
    },
};

/// A compiled regular expression.
///
/// A `Regex` is built from a pattern string with [`Regex::new`] (or through
/// a [`Builder`] when configuration is needed) and can then be used to run
/// any number of searches. Compilation happens exactly once; the compiled
/// automaton is immutable, internally reference counted and safe to share
/// across threads.
///
/// # Offsets
///
/// All offsets reported by a `Regex` — match bounds and capture spans — are
/// **codepoint offsets** into the haystack's `char` sequence, not byte
/// offsets into the `&str`.
///
/// # Match semantics
///
/// Searches are *leftmost greedy-longest*: of all viable starting
/// positions, the leftmost wins, and from that start the longest reachable
/// end wins. This differs from the leftmost-first rule of backtracking
/// engines: here `a|ab` matches all of `"ab"`.
///
/// # Example
///
/// ```
/// use regex_nfa::Regex;
///
/// let re = Regex::new(r"(?<day>\d{2})-(?<month>\d{2})")?;
/// let caps = re.captures("dated 07-01, received later").unwrap();
/// assert_eq!(6..11, caps.get_match().unwrap().range());
/// assert_eq!(6..8, caps.get_group_by_name("day").unwrap().range());
/// # Ok::<(), regex_nfa::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Regex {
    pattern: Arc<str>,
    vm: PikeVM,
}

/// Compile a pattern into a [`Regex`] with the default configuration.
///
/// This is a convenience for [`Regex::new`].
pub fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern)
}

/// A builder for a [`Regex`].
///
/// This permits setting the compiler configuration, currently the NFA state
/// limit. For the common case, use [`Regex::new`].
///
/// # Example
///
/// ```
/// use regex_nfa::{Builder, Config};
///
/// let re = Builder::new()
///     .configure(Config::new().state_limit(Some(10_000)))
///     .build(r"[0-9]{1,8}")?;
/// assert!(re.test("id 42"));
/// # Ok::<(), regex_nfa::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Set the compiler configuration for this builder.
    pub fn configure(mut self, config: Config) -> Builder {
        self.config = config;
        self
    }

    /// Compile the given pattern under this builder's configuration.
    pub fn build(&self, pattern: &str) -> Result<Regex, Error> {
        let parsed = syntax::parse(pattern)?;
        let nfa = compiler::compile(&self.config, &parsed)?;
        debug!("built regex for pattern {:?}", pattern);
        Ok(Regex { pattern: Arc::from(pattern), vm: PikeVM::new(nfa) })
    }
}

impl Regex {
    /// Compile the given pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Regex::builder().build(pattern)
    }

    /// Return a builder for configuring regex compilation.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Return the pattern string this regex was compiled from.
    #[inline]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Return the underlying NFA.
    ///
    /// The NFA exposes the automaton's topology — its states and labeled
    /// transitions — which is what a visualizer needs to render the graph.
    #[inline]
    pub fn nfa(&self) -> &NFA {
        self.vm.nfa()
    }

    /// Return the capturing group information of this regex.
    #[inline]
    pub fn group_info(&self) -> &GroupInfo {
        self.nfa().group_info()
    }

    /// Return the total number of capturing groups, including the implicit
    /// group `0` spanning the whole match.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.nfa().group_len()
    }

    /// Returns true when this regex matches somewhere in the haystack.
    pub fn test(&self, haystack: &str) -> bool {
        self.find(haystack).is_some()
    }

    /// Return the leftmost match in the haystack, if any.
    pub fn find(&self, haystack: &str) -> Option<Match> {
        self.find_at(haystack, 0)
    }

    /// Return the leftmost match beginning at or after the codepoint offset
    /// `from`.
    pub fn find_at(&self, haystack: &str, from: usize) -> Option<Match> {
        let chars: Vec<char> = haystack.chars().collect();
        let slots = self.vm.search(&chars, from)?;
        match_from_slots(&slots)
    }

    /// Return every non-overlapping match in the haystack, leftmost first.
    ///
    /// After a match ending at `e`, the scan resumes at `e`, or one past
    /// the match's start when the match was empty; no two returned matches
    /// share bounds.
    pub fn find_all(&self, haystack: &str) -> Vec<Match> {
        self.find_iter(haystack).collect()
    }

    /// Return an iterator over every non-overlapping match in the
    /// haystack.
    pub fn find_iter<'r>(&'r self, haystack: &str) -> FindMatches<'r> {
        FindMatches {
            re: self,
            haystack: haystack.chars().collect(),
            at: 0,
        }
    }

    /// Return the capturing groups of the leftmost match, if any.
    ///
    /// The result always contains group `0` (the overall match); explicit
    /// groups are present only when the winning path traversed them.
    pub fn captures(&self, haystack: &str) -> Option<Captures> {
        self.captures_at(haystack, 0)
    }

    /// Return the capturing groups of the leftmost match beginning at or
    /// after the codepoint offset `from`.
    pub fn captures_at(
        &self,
        haystack: &str,
        from: usize,
    ) -> Option<Captures> {
        let chars: Vec<char> = haystack.chars().collect();
        let slots = self.vm.search(&chars, from)?;
        Some(Captures::new(self.group_info().clone(), slots))
    }

    /// Return the capturing groups of every non-overlapping match in the
    /// haystack, leftmost first.
    pub fn captures_all(&self, haystack: &str) -> Vec<Captures> {
        self.captures_iter(haystack).collect()
    }

    /// Return an iterator over the capturing groups of every
    /// non-overlapping match in the haystack.
    pub fn captures_iter<'r>(
        &'r self,
        haystack: &str,
    ) -> CapturesMatches<'r> {
        CapturesMatches {
            re: self,
            haystack: haystack.chars().collect(),
            at: 0,
        }
    }
}

/// Build a match from the first two capture slots. Returns `None` when the
/// slots are unset, which cannot happen for a successful search.
fn match_from_slots(slots: &[Slot]) -> Option<Match> {
    let start = slots.first().copied().flatten()?;
    let end = slots.get(1).copied().flatten()?;
    Some(Match::new(Span { start: start.get(), end: end.get() }))
}

/// Given a just-returned match, the offset at which to resume scanning: one
/// past the end, or one past the start for an empty match so that the scan
/// always advances.
fn next_scan_offset(m: Match) -> usize {
    if m.is_empty() {
        m.start() + 1
    } else {
        m.end()
    }
}

/// An iterator over all non-overlapping matches of a regex in a haystack.
///
/// This is created by [`Regex::find_iter`]. The haystack is converted to
/// its codepoint sequence up front, so the iterator does not borrow it.
#[derive(Clone, Debug)]
pub struct FindMatches<'r> {
    re: &'r Regex,
    haystack: Vec<char>,
    at: usize,
}

impl Iterator for FindMatches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.at > self.haystack.len() {
            return None;
        }
        let slots = match self.re.vm.search(&self.haystack, self.at) {
            None => {
                self.at = self.haystack.len() + 1;
                return None;
            }
            Some(slots) => slots,
        };
        let m = match_from_slots(&slots)?;
        self.at = next_scan_offset(m);
        Some(m)
    }
}

/// An iterator over the capturing groups of all non-overlapping matches of
/// a regex in a haystack.
///
/// This is created by [`Regex::captures_iter`].
#[derive(Clone, Debug)]
pub struct CapturesMatches<'r> {
    re: &'r Regex,
    haystack: Vec<char>,
    at: usize,
}

impl Iterator for CapturesMatches<'_> {
    type Item = Captures;

    fn next(&mut self) -> Option<Captures> {
        if self.at > self.haystack.len() {
            return None;
        }
        let slots = match self.re.vm.search(&self.haystack, self.at) {
            None => {
                self.at = self.haystack.len() + 1;
                return None;
            }
            Some(slots) => slots,
        };
        let m = match_from_slots(&slots)?;
        self.at = next_scan_offset(m);
        Some(Captures::new(self.re.group_info().clone(), slots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_retained() {
        let re = Regex::new("a|b").unwrap();
        assert_eq!("a|b", re.pattern());
    }

    #[test]
    fn offsets_count_codepoints() {
        let re = Regex::new("l{2}").unwrap();
        // In byte terms the match would start at 3; in codepoints it
        // starts at 2.
        let m = re.find("héllo").unwrap();
        assert_eq!(2..4, m.range());
    }

    #[test]
    fn find_at_skips_earlier_matches() {
        let re = Regex::new("ab").unwrap();
        assert_eq!(0..2, re.find("abab").unwrap().range());
        assert_eq!(2..4, re.find_at("abab", 1).unwrap().range());
        assert_eq!(None, re.find_at("abab", 3));
    }

    #[test]
    fn iterators_and_collectors_agree() {
        let re = Regex::new("a+").unwrap();
        let haystack = "a aa aaa";
        let from_iter: Vec<Match> = re.find_iter(haystack).collect();
        assert_eq!(from_iter, re.find_all(haystack));
        assert_eq!(3, re.captures_all(haystack).len());
    }

    #[test]
    fn builder_applies_config() {
        let result = Regex::builder()
            .configure(Config::new().state_limit(Some(3)))
            .build("abcdef");
        assert!(result.is_err());
    }
}
