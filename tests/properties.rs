use quickcheck::quickcheck;
use regex_nfa::Regex;

/// A spread of patterns exercising every construct the engine supports.
fn subjects() -> Vec<Regex> {
    [
        "a*",
        "(a|b)+",
        "hello (w|w)orld!*",
        r"(?<k>\w+)=(?<v>\d+)",
        "[^abc]+",
        ".",
        "x?",
        "(T|t)h(e|(e|o)se)",
        r"[a-f]{2,4}\s*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
}

quickcheck! {
    /// test, find and captures always agree on whether a match exists.
    fn test_find_captures_agree(haystack: String) -> bool {
        subjects().iter().all(|re| {
            let matched = re.test(&haystack);
            matched == re.find(&haystack).is_some()
                && matched == re.captures(&haystack).is_some()
        })
    }

    /// Group 0 of a captures result always equals the find match.
    fn group_zero_is_the_match(haystack: String) -> bool {
        subjects().iter().all(|re| {
            match (re.find(&haystack), re.captures(&haystack)) {
                (None, None) => true,
                (Some(m), Some(caps)) => {
                    caps.get_match() == Some(m)
                        && caps.get_group(0) == Some(m.span())
                }
                _ => false,
            }
        })
    }

    /// find_all yields ordered, non-overlapping, pairwise distinct matches
    /// whose spans lie within the haystack.
    fn find_all_is_ordered_and_disjoint(haystack: String) -> bool {
        let len = haystack.chars().count();
        subjects().iter().all(|re| {
            let matches = re.find_all(&haystack);
            let in_bounds = matches
                .iter()
                .all(|m| m.start() <= m.end() && m.end() <= len);
            let ordered = matches.windows(2).all(|pair| {
                pair[1].start() >= pair[0].end().max(pair[0].start() + 1)
            });
            in_bounds && ordered
        })
    }

    /// Every reported capture lies inside its overall match's haystack
    /// bounds and has an ordered span.
    fn captures_are_well_formed(haystack: String) -> bool {
        let len = haystack.chars().count();
        subjects().iter().all(|re| {
            re.captures_all(&haystack).iter().all(|caps| {
                caps.iter().all(|c| {
                    c.start() <= c.end() && c.end() <= len
                })
            })
        })
    }

    /// Compiling the same pattern twice yields engines that cannot be told
    /// apart by their matches.
    fn compilation_is_deterministic(haystack: String) -> bool {
        let pattern = r"(a|b)*c{1,2}(?<t>\d?)";
        let re1 = Regex::new(pattern).unwrap();
        let re2 = Regex::new(pattern).unwrap();
        re1.find_all(&haystack) == re2.find_all(&haystack)
    }
}
