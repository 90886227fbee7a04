/*!
A BFS simulation of the NFA, in the style of Thompson's and Pike's original
implementations.

The simulator advances a *set* of live states codepoint by codepoint instead
of backtracking over individual paths, so its running time is bounded by
`O(haystack length * states^2)` no matter how ambiguous the pattern is.
Each live state carries a table of capture slots (two per group) that is
copied when paths branch and discarded when paths die.
*/

use log::trace;

use crate::{
    nfa::{Transition, NFA},
    util::{
        captures::Slot,
        primitives::{NonMaxUsize, StateID},
        sparse_set::SparseSet,
    },
};

/// The simulator that executes a compiled NFA over a haystack.
///
/// All scratch state (the active-state lists and the epsilon-closure stack)
/// is allocated per search call and released on return, so a `PikeVM` is
/// immutable and can be used from many threads at once.
#[derive(Clone, Debug)]
pub(crate) struct PikeVM {
    nfa: NFA,
}

impl PikeVM {
    pub(crate) fn new(nfa: NFA) -> PikeVM {
        PikeVM { nfa }
    }

    pub(crate) fn nfa(&self) -> &NFA {
        &self.nfa
    }

    /// Search for the leftmost match beginning at or after `from`.
    ///
    /// On a match, returns the capture slot table recorded at the accept
    /// state; slots `0` and `1` always hold the overall match bounds.
    ///
    /// The search is *greedy-longest*: among all matches sharing the
    /// leftmost viable starting position, the one with the largest end
    /// offset wins. That differs from the leftmost-first rule of
    /// backtracking engines: `a|ab` matches all of `"ab"`, not just `"a"`.
    pub(crate) fn search(
        &self,
        haystack: &[char],
        from: usize,
    ) -> Option<Vec<Slot>> {
        trace!(
            "starting search at {} of {} codepoints",
            from,
            haystack.len(),
        );
        let mut stack = vec![];
        let mut clist = ActiveStates::new(&self.nfa);
        let mut nlist = ActiveStates::new(&self.nfa);
        let mut thread = vec![None; self.nfa.group_info().slot_len()];
        // Try each start position in turn; the first one that yields any
        // match wins. The range is inclusive so that a pattern matching the
        // empty string can match just past the final codepoint.
        for start in from..=haystack.len() {
            let matched = self.run_anchored(
                &mut stack,
                &mut clist,
                &mut nlist,
                &mut thread,
                haystack,
                start,
            );
            if matched.is_some() {
                return matched;
            }
        }
        None
    }

    /// Run the NFA anchored at `start`, returning the slot table of the
    /// *longest* match found there, if any.
    fn run_anchored(
        &self,
        stack: &mut Vec<FollowEpsilon>,
        clist: &mut ActiveStates,
        nlist: &mut ActiveStates,
        thread: &mut [Slot],
        haystack: &[char],
        start: usize,
    ) -> Option<Vec<Slot>> {
        let accept = self.nfa.accept();
        clist.clear();
        nlist.clear();
        thread.fill(None);
        self.epsilon_closure(stack, clist, thread, self.nfa.start(), start);

        let mut matched: Option<Vec<Slot>> = None;
        let mut at = start;
        loop {
            if clist.set.is_empty() {
                break;
            }
            // Record the accept state's captures every time it is live;
            // later positions overwrite earlier ones, which is what makes
            // the search greedy-longest.
            if clist.set.contains(accept) {
                matched = Some(clist.slots(accept).to_vec());
            }
            if at >= haystack.len() {
                break;
            }
            let ch = haystack[at];
            for i in 0..clist.set.len() {
                let sid = clist.set.get(i);
                for trans in self.nfa.transitions(sid) {
                    let (matcher, next) = match *trans {
                        Transition::Symbol { ref matcher, next } => {
                            (matcher, next)
                        }
                        _ => continue,
                    };
                    if !matcher.matches(ch) {
                        continue;
                    }
                    // The successor inherits this state's capture slots.
                    // The closure mutates the row transiently but restores
                    // it in full before returning.
                    let thread = clist.slots_mut(sid);
                    self.epsilon_closure(stack, nlist, thread, next, at + 1);
                }
            }
            core::mem::swap(clist, nlist);
            nlist.clear();
            at += 1;
        }
        matched
    }

    /// Add to `nlist` every state reachable from `sid` via epsilon and
    /// group-tag transitions, recording for each the capture slots of the
    /// path that reached it first.
    ///
    /// The traversal uses an explicit stack. Group tags write into the
    /// shared `thread` row and push a restore frame underneath the subtree
    /// they guard, so sibling alternatives always observe the row exactly
    /// as it was when their common ancestor was expanded.
    fn epsilon_closure(
        &self,
        stack: &mut Vec<FollowEpsilon>,
        nlist: &mut ActiveStates,
        thread: &mut [Slot],
        sid: StateID,
        at: usize,
    ) {
        stack.push(FollowEpsilon::Explore(sid));
        while let Some(frame) = stack.pop() {
            match frame {
                FollowEpsilon::Explore(sid) => {
                    // First insertion wins: a state reached again by a
                    // later path keeps the captures of the earlier one.
                    if !nlist.set.insert(sid) {
                        continue;
                    }
                    nlist.slots_mut(sid).copy_from_slice(thread);
                    // Push in reverse so that exploration follows the
                    // transition order of the state.
                    for trans in self.nfa.transitions(sid).iter().rev() {
                        match *trans {
                            Transition::Epsilon { next } => {
                                stack.push(FollowEpsilon::Explore(next));
                            }
                            Transition::EnterGroup { group, next } => {
                                stack.push(FollowEpsilon::WriteSlot {
                                    slot: group as usize * 2,
                                    next,
                                });
                            }
                            Transition::LeaveGroup { group, next } => {
                                stack.push(FollowEpsilon::WriteSlot {
                                    slot: group as usize * 2 + 1,
                                    next,
                                });
                            }
                            Transition::Symbol { .. } => {}
                        }
                    }
                }
                FollowEpsilon::WriteSlot { slot, next } => {
                    stack.push(FollowEpsilon::RestoreSlot {
                        slot,
                        pos: thread[slot],
                    });
                    // `at` is at most the haystack length, so it always
                    // fits in a NonMaxUsize.
                    thread[slot] = NonMaxUsize::new(at);
                    stack.push(FollowEpsilon::Explore(next));
                }
                FollowEpsilon::RestoreSlot { slot, pos } => {
                    thread[slot] = pos;
                }
            }
        }
    }
}

/// A set of live NFA states along with one capture-slot row per state.
///
/// The slot rows are stored flat; a state's row is only meaningful while
/// the state is in the set, so `clear` need not touch the table.
#[derive(Clone, Debug)]
struct ActiveStates {
    set: SparseSet,
    slot_table: Vec<Slot>,
    slots_per_state: usize,
}

impl ActiveStates {
    fn new(nfa: &NFA) -> ActiveStates {
        let slots_per_state = nfa.group_info().slot_len();
        ActiveStates {
            set: SparseSet::new(nfa.len()),
            slot_table: vec![None; nfa.len() * slots_per_state],
            slots_per_state,
        }
    }

    fn clear(&mut self) {
        self.set.clear();
    }

    fn slots(&self, sid: StateID) -> &[Slot] {
        let i = sid.as_usize() * self.slots_per_state;
        &self.slot_table[i..i + self.slots_per_state]
    }

    fn slots_mut(&mut self, sid: StateID) -> &mut [Slot] {
        let i = sid.as_usize() * self.slots_per_state;
        &mut self.slot_table[i..i + self.slots_per_state]
    }
}

/// A frame of the explicit stack used for computing epsilon closures.
#[derive(Clone, Debug)]
enum FollowEpsilon {
    /// Visit the given state and expand its epsilon transitions.
    Explore(StateID),
    /// Traverse a group-tag transition: record the current position in the
    /// given slot, then explore the target.
    WriteSlot { slot: usize, next: StateID },
    /// Undo a slot write once the subtree it guarded has been explored.
    RestoreSlot { slot: usize, pos: Slot },
}
