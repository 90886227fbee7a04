use std::ops::Range;

use regex_nfa::{Regex, Span};

fn ranges(re: &Regex, haystack: &str) -> Vec<Range<usize>> {
    re.find_all(haystack).iter().map(|m| m.range()).collect()
}

#[test]
fn literal_with_group_and_star() {
    let re = Regex::new("hello (w|w)orld!*").unwrap();
    assert!(re.test("hello world!!!"));

    let caps = re.captures("hello world!!!").unwrap();
    assert_eq!(0..14, caps.get_match().unwrap().range());
    assert_eq!(Some(Span::from(6..7)), caps.get_group(1));
}

#[test]
fn named_date_groups() {
    let re =
        Regex::new(r"(?<day>\d{2})-(?<month>\d{2})-(?<year>\d{4})").unwrap();
    let caps = re.captures("07-01-2024").unwrap();
    assert_eq!(0..10, caps.get_match().unwrap().range());
    assert_eq!(Some(Span::from(0..2)), caps.get_group_by_name("day"));
    assert_eq!(Some(Span::from(3..5)), caps.get_group_by_name("month"));
    assert_eq!(Some(Span::from(6..10)), caps.get_group_by_name("year"));
    // The same spans are reachable by index.
    assert_eq!(caps.get_group(1), caps.get_group_by_name("day"));
    assert_eq!(caps.get_group(3), caps.get_group_by_name("year"));
}

#[test]
fn find_all_walks_every_match() {
    let re = Regex::new("(T|t)h(e|(e|o)se)").unwrap();
    assert_eq!(
        vec![0..3, 4..9, 10..15, 16..19],
        ranges(&re, "the These those The"),
    );
}

#[test]
fn bounded_repetition_is_greedy() {
    let re = Regex::new("a{2,4}").unwrap();
    assert_eq!(0..4, re.find("aaaaa").unwrap().range());
    assert_eq!(None, re.find("a"));
}

#[test]
fn zero_width_matches_at_every_position() {
    let re = Regex::new("a*").unwrap();
    assert_eq!(vec![0..0, 1..1, 2..2, 3..3], ranges(&re, "bbb"));
}

#[test]
fn negated_class_runs() {
    let re = Regex::new("[^abc]+").unwrap();
    assert_eq!(vec![0..2, 5..7], ranges(&re, "xxabcyy"));
}

#[test]
fn test_find_captures_agree() {
    let re = Regex::new("(mega|kilo)?bytes?").unwrap();
    for haystack in
        ["byte", "bytes", "kilobyte", "megabytes", "nothing here"]
    {
        let expected = re.find(haystack).is_some();
        assert_eq!(expected, re.test(haystack));
        assert_eq!(expected, re.captures(haystack).is_some());
    }
}

#[test]
fn greedy_longest_not_leftmost_first() {
    // A backtracking engine would stop at "a"; this engine extends to the
    // longest end reachable from the leftmost start.
    let re = Regex::new("a|ab").unwrap();
    assert_eq!(0..2, re.find("ab").unwrap().range());

    let re = Regex::new("(do|does)").unwrap();
    assert_eq!(0..4, re.find("does").unwrap().range());
}

#[test]
fn leftmost_start_beats_longer_later_match() {
    let re = Regex::new("a+|b+").unwrap();
    assert_eq!(0..1, re.find("abbbb").unwrap().range());
}

#[test]
fn dot_matches_newline() {
    let re = Regex::new("a.b").unwrap();
    assert!(re.test("a\nb"));
    assert!(re.test("axb"));
    assert!(!re.test("ab"));
}

#[test]
fn offsets_are_codepoint_offsets() {
    let re = Regex::new(r"\w+").unwrap();
    // "héllo wörld": the matches land at codepoint offsets even though
    // the byte offsets differ.
    let got = ranges(&re, "héllo wörld");
    // \w is ASCII-only, so the accented letters split the runs.
    assert_eq!(vec![0..1, 2..5, 6..7, 8..11], got);

    let re = Regex::new(".").unwrap();
    assert_eq!(vec![0..1, 1..2, 2..3], ranges(&re, "日本語"));
}

#[test]
fn shorthand_classes_are_ascii() {
    let re = Regex::new(r"\d+").unwrap();
    assert_eq!(0..3, re.find("123x").unwrap().range());
    // Arabic-Indic digits are not \d.
    assert!(!re.test("٣٤٥"));

    let re = Regex::new(r"\s").unwrap();
    assert!(re.test("\t"));
    assert!(re.test("\x0B"));
    assert!(!re.test("\u{00A0}"));

    // Negated shorthands cover the rest of Unicode.
    let re = Regex::new(r"\D+").unwrap();
    assert_eq!(0..3, re.find("٣٤٥9").unwrap().range());
}

#[test]
fn empty_pattern_matches_everywhere() {
    let re = Regex::new("").unwrap();
    assert!(re.test(""));
    assert_eq!(0..0, re.find("ab").unwrap().range());
    assert_eq!(vec![0..0, 1..1, 2..2], ranges(&re, "ab"));
}

#[test]
fn non_capturing_groups_are_transparent() {
    let canonical = Regex::new("(?:ab)+c").unwrap();
    assert_eq!(0..5, canonical.find("ababc").unwrap().range());
    assert_eq!(1, canonical.group_len());

    // The historical misspelling behaves identically.
    let misspelled = Regex::new("(:?ab)+c").unwrap();
    assert_eq!(0..5, misspelled.find("ababc").unwrap().range());
    assert_eq!(1, misspelled.group_len());
}

#[test]
fn captures_all_reports_per_match_groups() {
    let re = Regex::new(r"(?<key>\w+)=(?<value>\d+)").unwrap();
    let haystack = "a=1 bb=22 ccc=333";
    let all = re.captures_all(haystack);
    assert_eq!(3, all.len());

    let chars: Vec<char> = haystack.chars().collect();
    let text = |span: Span| -> String {
        chars[span.range()].iter().collect()
    };
    let keys: Vec<String> = all
        .iter()
        .map(|caps| text(caps.get_group_by_name("key").unwrap()))
        .collect();
    let values: Vec<String> = all
        .iter()
        .map(|caps| text(caps.get_group_by_name("value").unwrap()))
        .collect();
    assert_eq!(vec!["a", "bb", "ccc"], keys);
    assert_eq!(vec!["1", "22", "333"], values);
}

#[test]
fn untraversed_groups_are_absent() {
    let re = Regex::new("(x)|(y)").unwrap();
    let caps = re.captures("y").unwrap();
    assert_eq!(None, caps.get_group(1));
    assert_eq!(Some(Span::from(0..1)), caps.get_group(2));

    // Iteration yields only the participating groups, in index order.
    let groups: Vec<usize> = caps.iter().map(|c| c.group()).collect();
    assert_eq!(vec![0, 2], groups);
}

#[test]
fn capture_iter_exposes_names() {
    let re = Regex::new(r"(?<word>[a-z]+)(\d*)").unwrap();
    let caps = re.captures("abc123").unwrap();
    let got: Vec<(usize, Option<String>, Range<usize>)> = caps
        .iter()
        .map(|c| (c.group(), c.name().map(String::from), c.span().range()))
        .collect();
    assert_eq!(
        vec![
            (0, None, 0..6),
            (1, Some("word".to_string()), 0..3),
            (2, None, 3..6),
        ],
        got,
    );
}

#[test]
fn optional_group_inside_repetition() {
    let re = Regex::new("(ab?)+").unwrap();
    let caps = re.captures("aba").unwrap();
    assert_eq!(0..3, caps.get_match().unwrap().range());
    // The group reports its final iteration.
    assert_eq!(Some(Span::from(2..3)), caps.get_group(1));
}

#[test]
fn classes_with_ranges_and_shorthands() {
    let re = Regex::new(r"[a-f\d_]+").unwrap();
    assert_eq!(0..4, re.find("be_4x").unwrap().range());

    let re = Regex::new(r"[-+]?\d+").unwrap();
    assert_eq!(0..3, re.find("-42z").unwrap().range());
    assert_eq!(0..2, re.find("17").unwrap().range());
}

#[test]
fn escaped_metacharacters_are_literals() {
    let re = Regex::new(r"\(\d+\)").unwrap();
    assert_eq!(3..7, re.find("ab (42)").unwrap().range());

    let re = Regex::new(r"a\.b").unwrap();
    assert!(re.test("a.b"));
    assert!(!re.test("axb"));
}

#[test]
fn open_ended_repetition() {
    let re = Regex::new("ab{2,}").unwrap();
    assert!(!re.test("ab"));
    assert_eq!(0..3, re.find("abb").unwrap().range());
    assert_eq!(0..6, re.find("abbbbb").unwrap().range());
}

#[test]
fn find_all_never_overlaps_or_repeats() {
    let re = Regex::new("a*").unwrap();
    let matches = re.find_all("aabaa");
    for pair in matches.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        assert!(next.start() >= prev.end().max(prev.start() + 1));
        assert_ne!(prev.range(), next.range());
    }
    assert_eq!(vec![0..2, 2..2, 3..5, 5..5], ranges(&re, "aabaa"));
}

#[test]
fn compilation_is_deterministic() {
    let pattern = "(a|b)*c{2,3}(?<tail>x?)";
    let re1 = Regex::new(pattern).unwrap();
    let re2 = Regex::new(pattern).unwrap();
    let haystack = "abacbccx and bbaccc too";
    assert_eq!(re1.find_all(haystack), re2.find_all(haystack));
    assert_eq!(
        re1.nfa().states().count(),
        re2.nfa().states().count(),
    );
}

#[test]
fn engine_is_shareable_across_threads() {
    let re = Regex::new(r"\w+").unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let re = re.clone();
            std::thread::spawn(move || {
                let haystack = format!("thread {} text", i);
                re.find_all(&haystack).len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(3, handle.join().unwrap());
    }
}
