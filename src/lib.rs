/*!
A regular expression engine built on epsilon-NFA simulation.

This crate compiles a pattern string into a Thompson NFA and executes that
automaton over haystacks with a breadth-first, set-based simulation (a Pike
VM). That buys the two properties the engine is organized around:

* **No pathological backtracking.** The simulator advances a set of live
  states one codepoint at a time, so search time is bounded by
  `O(haystack length * states^2)` regardless of how ambiguous the pattern
  is.
* **An inspectable automaton.** The compiled [`NFA`](nfa::NFA) exposes its
  states and labeled transitions, enough to render the automaton as a
  graph: state `0` is the start, the highest state is the accept, and every
  transition carries a printable label.

The surface grammar covers literals, `.`, the shorthand classes
`\d \D \w \W \s \S`, bracketed classes, alternation, the quantifiers
`* + ? {n} {n,} {n,m}`, and plain/non-capturing/named groups. Searches
report codepoint offsets and resolve capturing groups, by index and by
name. There are no anchors, backreferences or look-around.

# Example: test, find, captures

```
use regex_nfa::Regex;

let re = Regex::new(r"(?<day>\d{2})-(?<month>\d{2})-(?<year>\d{4})")?;
assert!(re.test("07-01-2024"));

let m = re.find("on 07-01-2024, maybe").unwrap();
assert_eq!(3..13, m.range());

let caps = re.captures("on 07-01-2024, maybe").unwrap();
assert_eq!(3..5, caps.get_group_by_name("day").unwrap().range());
assert_eq!(9..13, caps.get_group(3).unwrap().range());
# Ok::<(), regex_nfa::Error>(())
```

# Example: iterating over matches

```
use regex_nfa::Regex;

let re = Regex::new("[^ ]+")?;
let words: Vec<_> = re.find_iter("pike vm").map(|m| m.range()).collect();
assert_eq!(vec![0..4, 5..7], words);
# Ok::<(), regex_nfa::Error>(())
```

# Example: walking the automaton

```
use regex_nfa::Regex;

let re = Regex::new("a|b")?;
let nfa = re.nfa();
for sid in nfa.states() {
    for t in nfa.transitions(sid) {
        println!("{} --{}--> {}", sid, t.label(), t.next());
    }
}
# Ok::<(), regex_nfa::Error>(())
```

# Match semantics

Searches are leftmost greedy-longest: among all viable starting positions
the leftmost wins, and from that start the largest reachable end offset
wins. `.` matches every codepoint, newline included. All reported offsets
count codepoints, not bytes.
*/

#![warn(missing_docs)]

pub use crate::{
    error::{Error, ErrorKind},
    nfa::Config,
    regex::{compile, Builder, CapturesMatches, FindMatches, Regex},
    util::{
        captures::{Capture, Captures, CapturesIter, GroupInfo},
        primitives::StateID,
        search::{Match, Span},
    },
};

mod error;
pub mod nfa;
mod pikevm;
mod regex;
pub mod syntax;
mod util;
