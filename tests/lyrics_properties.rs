// tests/lyrics_properties.rs

use proptest::prelude::*;
use fetchproc::lyrics::{AllWordsMatcher, LineCursor, LyricsView, Matcher};

fn line_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{0,24}"
}

proptest! {
    #[test]
    fn show_keeps_exactly_the_non_empty_lines(lines in proptest::collection::vec(line_strategy(), 0..12)) {
        let text = lines.join("\n");
        let mut view = LyricsView::new();
        view.show(&text);

        let expected: Vec<&str> = lines.iter().map(String::as_str).filter(|l| !l.is_empty()).collect();
        prop_assert_eq!(view.lines(), expected.as_slice());
    }

    #[test]
    fn a_line_matches_any_subset_of_its_own_words(line in line_strategy(), take in 1usize..4) {
        let words: Vec<&str> = line.split_whitespace().take(take).collect();
        prop_assume!(!words.is_empty());

        let query = words.join(" ").to_uppercase();
        prop_assert!(AllWordsMatcher.matches(&line, &query));
    }

    #[test]
    fn search_forward_lands_on_a_matching_line(
        lines in proptest::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,3}", 1..10),
        query in "[a-z]{1,3}",
    ) {
        let mut view = LyricsView::new();
        view.show(&lines.join("\n"));

        match view.search_forward(&query) {
            Some(index) => {
                prop_assert!(view.matches(index, &query));
                prop_assert_eq!(view.current(), Some(index));
            }
            None => prop_assert!(view.matching(&query).is_empty()),
        }
    }
}
