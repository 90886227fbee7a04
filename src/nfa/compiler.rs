use log::debug;

use crate::{
    error::Error,
    nfa::{Matcher, State, Transition, NFA},
    syntax::{
        ast::{Ast, Group, GroupKind, Repetition},
        ParsedPattern,
    },
    util::{captures::GroupInfo, primitives::StateID},
};

/// The configuration used for compiling a pattern into an NFA.
#[derive(Clone, Debug, Default)]
pub struct Config {
    state_limit: Option<usize>,
}

impl Config {
    /// Return a new default compiler configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set a limit on the number of states the compiled NFA may have.
    ///
    /// Bounded repetitions are compiled by copying their inner expression,
    /// so a small pattern like `(a{50}){50}` produces a large automaton and
    /// a correspondingly slow search. Since search time grows with the
    /// number of states, capping the state count is an effective way to
    /// reject such patterns up front while keeping the search APIs
    /// infallible.
    ///
    /// The default is no limit.
    pub fn state_limit(mut self, limit: Option<usize>) -> Config {
        self.state_limit = limit;
        self
    }

    /// Return the configured state limit, if any.
    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit
    }
}

/// Compile a parsed pattern into an NFA under the given configuration.
pub(crate) fn compile(
    config: &Config,
    parsed: &ParsedPattern,
) -> Result<NFA, Error> {
    Compiler::new(config.clone()).compile(parsed)
}

/// A Thompson NFA fragment: the identifiers of its entry and exit states.
///
/// Construction guarantees that a fragment's exit has no outgoing
/// transitions at the time the fragment is returned, so callers are free to
/// splice fragments together by attaching epsilon transitions to `end`.
#[derive(Clone, Copy, Debug)]
struct ThompsonRef {
    start: StateID,
    end: StateID,
}

/// A compiler that walks an AST bottom-up, assembling an NFA fragment for
/// every sub-expression.
#[derive(Clone, Debug)]
struct Compiler {
    config: Config,
    states: Vec<State>,
}

impl Compiler {
    fn new(config: Config) -> Compiler {
        Compiler { config, states: vec![] }
    }

    fn compile(mut self, parsed: &ParsedPattern) -> Result<NFA, Error> {
        // The start state must be id 0 and the accept state must be the
        // highest id, so allocate them first and last respectively. The
        // whole pattern is bracketed by the tags of the implicit group 0,
        // which is how the simulator learns the overall match span.
        let start = self.add_state()?;
        let frag = self.c(&parsed.ast)?;
        let accept = self.add_state()?;
        self.add_transition(
            start,
            Transition::EnterGroup { group: 0, next: frag.start },
        );
        self.add_transition(
            frag.end,
            Transition::LeaveGroup { group: 0, next: accept },
        );
        let group_info = GroupInfo::new(parsed.capture_names.clone());
        debug!(
            "compiled NFA with {} states and {} capture groups",
            self.states.len(),
            group_info.group_len(),
        );
        Ok(NFA::new(self.states, group_info))
    }

    fn c(&mut self, ast: &Ast) -> Result<ThompsonRef, Error> {
        match *ast {
            Ast::Empty => self.c_empty(),
            Ast::Literal(ch) => self.c_symbol(Matcher::Char(ch)),
            Ast::Any => self.c_symbol(Matcher::Any),
            Ast::Perl(perl) => self.c_symbol(Matcher::Perl(perl)),
            Ast::Class(ref class) => {
                self.c_symbol(Matcher::Class(class.clone()))
            }
            Ast::Concat(ref lhs, ref rhs) => {
                let lhs = self.c(lhs)?;
                let rhs = self.c(rhs)?;
                self.add_epsilon(lhs.end, rhs.start);
                Ok(ThompsonRef { start: lhs.start, end: rhs.end })
            }
            Ast::Alternate(ref lhs, ref rhs) => self.c_alternate(lhs, rhs),
            Ast::Repeat(ref rep) => self.c_repeat(rep),
            Ast::Group(ref group) => self.c_group(group),
        }
    }

    /// Compile an expression matching only the empty string.
    fn c_empty(&mut self) -> Result<ThompsonRef, Error> {
        let start = self.add_state()?;
        let end = self.add_state()?;
        self.add_epsilon(start, end);
        Ok(ThompsonRef { start, end })
    }

    /// Compile an expression consuming exactly one codepoint.
    fn c_symbol(&mut self, matcher: Matcher) -> Result<ThompsonRef, Error> {
        let start = self.add_state()?;
        let end = self.add_state()?;
        self.add_transition(
            start,
            Transition::Symbol { matcher, next: end },
        );
        Ok(ThompsonRef { start, end })
    }

    /// Compile `lhs|rhs`: a fresh fork state with an epsilon into each
    /// branch and a fresh join state each branch exits into.
    ///
    /// The fork's transitions are ordered left branch first; the simulator
    /// relies on that order to break ties in favor of earlier alternatives.
    fn c_alternate(
        &mut self,
        lhs: &Ast,
        rhs: &Ast,
    ) -> Result<ThompsonRef, Error> {
        let start = self.add_state()?;
        let lhs = self.c(lhs)?;
        let rhs = self.c(rhs)?;
        let end = self.add_state()?;
        self.add_epsilon(start, lhs.start);
        self.add_epsilon(start, rhs.start);
        self.add_epsilon(lhs.end, end);
        self.add_epsilon(rhs.end, end);
        Ok(ThompsonRef { start, end })
    }

    /// Compile a repetition by lowering it to copies of the inner
    /// expression: `min` mandatory copies, followed by an unbounded Kleene
    /// tail (`{n,}`) or `max - min` optional copies (`{n,m}`).
    ///
    /// Every copy is compiled afresh rather than shared. Sharing would
    /// merge the capture tags of distinct iterations, and a capturing group
    /// must fire once per traversal of its lexical location.
    fn c_repeat(&mut self, rep: &Repetition) -> Result<ThompsonRef, Error> {
        let mut frag: Option<ThompsonRef> = None;
        for _ in 0..rep.min {
            let copy = self.c(&rep.ast)?;
            frag = Some(self.join(frag, copy));
        }
        match rep.max {
            Some(max) if max == rep.min => {}
            Some(max) => {
                for _ in rep.min..max {
                    let copy = self.c_optional(&rep.ast)?;
                    frag = Some(self.join(frag, copy));
                }
            }
            None => {
                let copy = self.c_kleene(&rep.ast)?;
                frag = Some(self.join(frag, copy));
            }
        }
        // `a{0}` repeats zero times: it matches only the empty string.
        match frag {
            Some(frag) => Ok(frag),
            None => self.c_empty(),
        }
    }

    /// Compile `ast?`: a fresh copy of `ast` that may be skipped.
    fn c_optional(&mut self, ast: &Ast) -> Result<ThompsonRef, Error> {
        let start = self.add_state()?;
        let inner = self.c(ast)?;
        let end = self.add_state()?;
        self.add_epsilon(start, inner.start);
        self.add_epsilon(start, end);
        self.add_epsilon(inner.end, end);
        Ok(ThompsonRef { start, end })
    }

    /// Compile `ast*`: a fresh copy of `ast` inside a Kleene loop.
    fn c_kleene(&mut self, ast: &Ast) -> Result<ThompsonRef, Error> {
        let start = self.add_state()?;
        let inner = self.c(ast)?;
        let end = self.add_state()?;
        self.add_epsilon(start, inner.start);
        self.add_epsilon(start, end);
        self.add_epsilon(inner.end, start);
        self.add_epsilon(inner.end, end);
        Ok(ThompsonRef { start, end })
    }

    /// Compile a group. Capturing groups bracket their inner fragment with
    /// tagged epsilon transitions; non-capturing groups are transparent.
    fn c_group(&mut self, group: &Group) -> Result<ThompsonRef, Error> {
        let index = match group.kind {
            GroupKind::Capture { index, .. } => index,
            GroupKind::NonCapture => return self.c(&group.ast),
        };
        let start = self.add_state()?;
        let inner = self.c(&group.ast)?;
        let end = self.add_state()?;
        self.add_transition(
            start,
            Transition::EnterGroup { group: index, next: inner.start },
        );
        self.add_transition(
            inner.end,
            Transition::LeaveGroup { group: index, next: end },
        );
        Ok(ThompsonRef { start, end })
    }

    /// Splice `next` onto the end of `prev` with an epsilon transition.
    fn join(
        &mut self,
        prev: Option<ThompsonRef>,
        next: ThompsonRef,
    ) -> ThompsonRef {
        match prev {
            None => next,
            Some(prev) => {
                self.add_epsilon(prev.end, next.start);
                ThompsonRef { start: prev.start, end: next.end }
            }
        }
    }

    fn add_state(&mut self) -> Result<StateID, Error> {
        let id = self.states.len();
        let limit = self.config.get_state_limit().unwrap_or(StateID::LIMIT);
        if id >= limit {
            return Err(Error::too_many_states(limit));
        }
        // The configured limit is clamped by what a StateID can represent.
        let sid = match StateID::new(id) {
            None => return Err(Error::too_many_states(StateID::LIMIT)),
            Some(sid) => sid,
        };
        self.states.push(State { trans: vec![] });
        Ok(sid)
    }

    fn add_epsilon(&mut self, from: StateID, to: StateID) {
        self.add_transition(from, Transition::Epsilon { next: to });
    }

    fn add_transition(&mut self, from: StateID, trans: Transition) {
        self.states[from.as_usize()].trans.push(trans);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, syntax};

    fn nfa(pattern: &str) -> NFA {
        compile(&Config::new(), &syntax::parse(pattern).unwrap()).unwrap()
    }

    fn sid(id: usize) -> StateID {
        StateID::new(id).unwrap()
    }

    fn epsilon(next: usize) -> Transition {
        Transition::Epsilon { next: sid(next) }
    }

    fn symbol(ch: char, next: usize) -> Transition {
        Transition::Symbol { matcher: Matcher::Char(ch), next: sid(next) }
    }

    #[test]
    fn concatenation_shape() {
        let nfa = nfa("hi");
        assert_eq!(6, nfa.len());
        assert_eq!(sid(0), nfa.start());
        assert_eq!(sid(5), nfa.accept());
        assert_eq!(
            &[Transition::EnterGroup { group: 0, next: sid(1) }],
            nfa.transitions(sid(0)),
        );
        assert_eq!(&[symbol('h', 2)], nfa.transitions(sid(1)));
        assert_eq!(&[epsilon(3)], nfa.transitions(sid(2)));
        assert_eq!(&[symbol('i', 4)], nfa.transitions(sid(3)));
        assert_eq!(
            &[Transition::LeaveGroup { group: 0, next: sid(5) }],
            nfa.transitions(sid(4)),
        );
        assert!(nfa.transitions(sid(5)).is_empty());
    }

    #[test]
    fn alternation_shape() {
        let nfa = nfa("a|b");
        assert_eq!(8, nfa.len());
        // State 1 is the fork; its first epsilon leads into the left
        // branch.
        assert_eq!(&[epsilon(2), epsilon(4)], nfa.transitions(sid(1)));
        assert_eq!(&[symbol('a', 3)], nfa.transitions(sid(2)));
        assert_eq!(&[symbol('b', 5)], nfa.transitions(sid(4)));
        assert_eq!(&[epsilon(6)], nfa.transitions(sid(3)));
        assert_eq!(&[epsilon(6)], nfa.transitions(sid(5)));
    }

    #[test]
    fn kleene_star_shape() {
        let nfa = nfa("a*");
        assert_eq!(6, nfa.len());
        assert_eq!(&[epsilon(2), epsilon(4)], nfa.transitions(sid(1)));
        assert_eq!(&[symbol('a', 3)], nfa.transitions(sid(2)));
        // The loop back-edge targets the fork state.
        assert_eq!(&[epsilon(1), epsilon(4)], nfa.transitions(sid(3)));
    }

    #[test]
    fn bounded_repetition_copies_are_fresh() {
        // a{2,3} = two mandatory copies plus one optional copy, each with
        // its own pair of states.
        let nfa = nfa("a{2,3}");
        let symbols = nfa
            .states()
            .flat_map(|sid| nfa.transitions(sid))
            .filter(|t| !t.is_epsilon())
            .count();
        assert_eq!(3, symbols);
    }

    #[test]
    fn group_tags_are_balanced() {
        for pattern in
            ["(a)", "(a|b)*", "(?<x>a(b))+c", "(a){2,4}", "x(?:y(z))?"]
        {
            let nfa = nfa(pattern);
            let mut enters = vec![];
            let mut leaves = vec![];
            for sid in nfa.states() {
                for trans in nfa.transitions(sid) {
                    match *trans {
                        Transition::EnterGroup { group, .. } => {
                            enters.push(group)
                        }
                        Transition::LeaveGroup { group, .. } => {
                            leaves.push(group)
                        }
                        _ => {}
                    }
                }
            }
            enters.sort_unstable();
            leaves.sort_unstable();
            assert_eq!(enters, leaves, "unbalanced tags in {:?}", pattern);
            assert!(enters.contains(&0));
        }
    }

    #[test]
    fn named_groups_are_queryable() {
        let nfa = nfa("(?<day>a)(b)(?<year>c)");
        let info = nfa.group_info();
        assert_eq!(4, info.group_len());
        assert_eq!(Some(1), info.to_index("day"));
        assert_eq!(Some(3), info.to_index("year"));
        assert_eq!(None, info.to_name(2));
        assert_eq!(Some("year"), info.to_name(3));
    }

    #[test]
    fn state_limit_is_enforced() {
        let parsed = syntax::parse("abc").unwrap();
        let config = Config::new().state_limit(Some(4));
        let err = compile(&config, &parsed).unwrap_err();
        assert_eq!(&ErrorKind::TooManyStates { limit: 4 }, err.kind());

        let config = Config::new().state_limit(Some(64));
        assert!(compile(&config, &parsed).is_ok());
    }

    #[test]
    fn empty_pattern_compiles() {
        let nfa = nfa("");
        assert_eq!(4, nfa.len());
        assert_eq!(sid(0), nfa.start());
        assert_eq!(sid(3), nfa.accept());
    }
}
