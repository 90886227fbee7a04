/*!
An epsilon-NFA produced by Thompson construction, along with its compiler.

The NFA is the engine's central data type: the compiler builds one from a
pattern's AST, the simulator executes it, and the introspection accessors
([`NFA::states`], [`NFA::transitions`]) expose its topology so that a caller
can render the automaton as a graph.
*/

use std::sync::Arc;

use crate::{
    syntax::ast::{Class, PerlClass},
    util::{captures::GroupInfo, primitives::StateID},
};

pub use self::compiler::Config;

pub(crate) mod compiler;

/// A Thompson epsilon-NFA compiled from a single pattern.
///
/// # Shape
///
/// States are stored in a flat list and referred to by [`StateID`]; a
/// transition names its target by id, never by pointer, which keeps the
/// cyclic structure of Kleene loops trivially representable and the whole
/// automaton shareable. State `0` is the start state and state
/// `len() - 1` is the single accept state.
///
/// The entire pattern is bracketed by a pair of
/// [`EnterGroup`](Transition::EnterGroup)/[`LeaveGroup`](Transition::LeaveGroup)
/// transitions for group `0`, so the overall match span is recorded by the
/// same mechanism as every explicit capturing group.
///
/// # Cheap clones
///
/// An NFA is internally reference counted, so cloning it is cheap and
/// shares the underlying states. The NFA is never mutated after
/// construction.
#[derive(Clone)]
pub struct NFA(Arc<Inner>);

struct Inner {
    states: Vec<State>,
    group_info: GroupInfo,
}

impl NFA {
    pub(crate) fn new(states: Vec<State>, group_info: GroupInfo) -> NFA {
        debug_assert!(states.len() >= 2);
        NFA(Arc::new(Inner { states, group_info }))
    }

    /// Returns the number of states in this NFA.
    ///
    /// This is always at least `2`: even the empty pattern compiles to a
    /// distinct start and accept state.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.states.len()
    }

    /// Returns the identifier of the start state. This is always `0`.
    #[inline]
    pub fn start(&self) -> StateID {
        StateID::ZERO
    }

    /// Returns the identifier of the accept state. This is always the
    /// highest state identifier in the NFA.
    #[inline]
    pub fn accept(&self) -> StateID {
        StateID::new_unchecked(self.len() - 1)
    }

    /// Returns an iterator over all state identifiers, in order.
    pub fn states(&self) -> impl ExactSizeIterator<Item = StateID> {
        (0..self.len()).map(StateID::new_unchecked)
    }

    /// Returns the ordered outgoing transitions of the given state.
    ///
    /// # Panics
    ///
    /// This panics when the identifier does not belong to this NFA.
    #[inline]
    pub fn transitions(&self, sid: StateID) -> &[Transition] {
        &self.0.states[sid.as_usize()].trans
    }

    /// Returns the capturing group information for this NFA.
    #[inline]
    pub fn group_info(&self) -> &GroupInfo {
        &self.0.group_info
    }

    /// Returns the total number of capturing groups, including the implicit
    /// group `0`.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.0.group_info.group_len()
    }
}

impl core::fmt::Debug for NFA {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        writeln!(f, "NFA(")?;
        for sid in self.states() {
            let marker = if sid == self.start() {
                ">"
            } else if sid == self.accept() {
                "*"
            } else {
                " "
            };
            write!(f, "{}{:06}:", marker, sid.as_usize())?;
            for (i, trans) in self.transitions(sid).iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, " {} => {}", trans.label(), trans.next())?;
            }
            writeln!(f)?;
        }
        writeln!(f, ")")
    }
}

/// A single NFA state: an ordered list of outgoing transitions.
///
/// The order is significant to the simulator. When two paths reach the same
/// state, the one that follows an earlier transition wins, which is what
/// makes captures deterministic.
#[derive(Clone, Debug)]
pub(crate) struct State {
    pub(crate) trans: Vec<Transition>,
}

/// A single outgoing transition of an NFA state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Transition {
    /// An unconditional transition that consumes no input.
    Epsilon {
        /// The target state.
        next: StateID,
    },
    /// An epsilon transition tagged with the opening of a capturing group:
    /// traversing it records the current position as the group's start.
    EnterGroup {
        /// The capture group index.
        group: u32,
        /// The target state.
        next: StateID,
    },
    /// An epsilon transition tagged with the closing of a capturing group:
    /// traversing it records the current position as the group's end.
    LeaveGroup {
        /// The capture group index.
        group: u32,
        /// The target state.
        next: StateID,
    },
    /// A transition that consumes exactly one codepoint accepted by its
    /// matcher.
    Symbol {
        /// The predicate deciding which codepoints this transition accepts.
        matcher: Matcher,
        /// The target state.
        next: StateID,
    },
}

impl Transition {
    /// Returns the target state of this transition.
    #[inline]
    pub fn next(&self) -> StateID {
        match *self {
            Transition::Epsilon { next }
            | Transition::EnterGroup { next, .. }
            | Transition::LeaveGroup { next, .. }
            | Transition::Symbol { next, .. } => next,
        }
    }

    /// Returns true when this transition consumes no input, i.e., it is an
    /// epsilon or a group tag.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        !matches!(*self, Transition::Symbol { .. })
    }

    /// Returns a human readable label for this transition, suitable for
    /// rendering the automaton as a graph: `"ε"` for plain epsilons,
    /// `"ε[+g2]"`/`"ε[-g2]"` for group tags and the matcher's own notation
    /// for symbol transitions.
    ///
    /// The exact strings are informational; callers should not parse them.
    pub fn label(&self) -> String {
        match *self {
            Transition::Epsilon { .. } => "ε".to_string(),
            Transition::EnterGroup { group, .. } => {
                format!("ε[+g{}]", group)
            }
            Transition::LeaveGroup { group, .. } => {
                format!("ε[-g{}]", group)
            }
            Transition::Symbol { ref matcher, .. } => matcher.to_string(),
        }
    }
}

/// The predicate of a symbol transition: decides which codepoints the
/// transition consumes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Matcher {
    /// Accepts exactly one codepoint.
    Char(char),
    /// Accepts every codepoint, newline included. Compiled from `.`.
    Any,
    /// Accepts the codepoints of a shorthand class, e.g., `\w`.
    Perl(PerlClass),
    /// Accepts the codepoints of a bracketed class.
    Class(Class),
}

impl Matcher {
    /// Returns true when this matcher accepts the given codepoint.
    #[inline]
    pub fn matches(&self, ch: char) -> bool {
        match *self {
            Matcher::Char(lit) => ch == lit,
            Matcher::Any => true,
            Matcher::Perl(ref perl) => perl.matches(ch),
            Matcher::Class(ref class) => class.matches(ch),
        }
    }
}

impl core::fmt::Display for Matcher {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Matcher::Char(ch) => write!(f, "{}", ch.escape_debug()),
            Matcher::Any => write!(f, "."),
            Matcher::Perl(ref perl) => write!(f, "{}", perl),
            Matcher::Class(ref class) => write!(f, "{}", class),
        }
    }
}
