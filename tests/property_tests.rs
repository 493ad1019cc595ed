//! Property-based tests for the Jay front end
//!
//! These tests use proptest to check the combinator laws and the source position mapping across many randomly
//! generated inputs.

use jay::grammar::Grammar;
use jay::parser::{Atom, Input, LITERAL_KIND, PATTERN_KIND, Parser};
use jay::source::{Source, SourceFile};
use proptest::prelude::*;
use regex::Regex;

fn empty_grammar() -> Grammar {
    Grammar::new("root")
}

// =============================================================================
// Combinator Properties
// =============================================================================

#[cfg(test)]
mod combinator_tests {
    use super::*;

    proptest! {
        /// Property: `any` never fails and stops right after the last repetition
        #[test]
        fn any_never_fails(a_count in 0usize..20, tail in "[b-z]{0,5}") {
            let text = format!("{}{tail}", "a".repeat(a_count));
            let grammar = empty_grammar();
            let mut p = Parser::new(&grammar, Input::Text(&text));
            let items = p.any(&[Atom::Literal("a")]).unwrap();
            prop_assert_eq!(items.len(), a_count);
            prop_assert_eq!(p.offset(), a_count);
        }

        /// Property: `many` fails iff there is no repetition, and otherwise agrees with `any`
        #[test]
        fn many_agrees_with_any(a_count in 0usize..20, tail in "[b-z]{0,5}") {
            let text = format!("{}{tail}", "a".repeat(a_count));
            let grammar = empty_grammar();

            let mut with_many = Parser::new(&grammar, Input::Text(&text));
            let many = with_many.many(&[Atom::Literal("a")]);
            let mut with_any = Parser::new(&grammar, Input::Text(&text));
            let any = with_any.any(&[Atom::Literal("a")]).unwrap();

            prop_assert_eq!(many.is_err(), a_count == 0);
            if let Ok(items) = many {
                prop_assert_eq!(items, any);
                prop_assert_eq!(with_many.offset(), with_any.offset());
            }
        }

        /// Property: when two alternatives match at the same offset, `one` returns the first
        #[test]
        fn one_prefers_first_alternative(word in "[a-z]{1,8}") {
            let pattern = Regex::new("[a-z]+").unwrap();
            let grammar = empty_grammar();

            let mut p = Parser::new(&grammar, Input::Text(&word));
            let node = p.one(&[Atom::Literal(&word), Atom::Pattern(&pattern)]).unwrap();
            prop_assert_eq!(node.kind.as_str(), LITERAL_KIND);

            let mut p = Parser::new(&grammar, Input::Text(&word));
            let node = p.one(&[Atom::Pattern(&pattern), Atom::Literal(&word)]).unwrap();
            prop_assert_eq!(node.kind.as_str(), PATTERN_KIND);
        }

        /// Property: a successful atom's node starts where the cursor was and the cursor moves by the match
        #[test]
        fn span_matches_cursor(prefix in "[0-9]{0,6}", word in "[a-z]{1,8}") {
            let text = format!("{prefix}{word}");
            let digits = Regex::new("[0-9]*").unwrap();
            let grammar = empty_grammar();
            let mut p = Parser::new(&grammar, Input::Text(&text));
            p.opt(&[Atom::Pattern(&digits)]).unwrap();
            let start = p.offset();
            let node = p.one(&[Atom::Literal(&word)]).unwrap();
            prop_assert_eq!(node.position, start);
            prop_assert_eq!(p.offset(), start + word.len());
        }
    }
}

// =============================================================================
// Position Mapping Properties
// =============================================================================

#[cfg(test)]
mod position_tests {
    use super::*;

    proptest! {
        /// Property: every offset maps back to the line and column it was taken from
        #[test]
        fn offsets_map_to_line_and_column(lines in prop::collection::vec("[a-z ]{0,10}", 1..8)) {
            let text = lines.join("\n");
            let source = Source::from_files([SourceFile::new("main.j", text.clone())]);
            let mut offset = 0;
            for (number, line) in lines.iter().enumerate() {
                for column in 0..=line.len() {
                    let info = source.position_info(offset + column).unwrap();
                    prop_assert_eq!(info.line, number + 1);
                    prop_assert_eq!(info.column, column);
                    prop_assert_eq!(&info.line_text, line);
                }
                offset += line.len() + 1;
            }
            prop_assert!(source.position_info(text.len() + 1).is_err());
        }

        /// Property: position mapping is deterministic
        #[test]
        fn position_info_is_idempotent(text in "[a-z\n]{1,40}", pick in any::<prop::sample::Index>()) {
            let source = Source::from_files([SourceFile::new("main.j", text.clone())]);
            let offset = pick.index(text.len() + 1);
            let first = source.position_info(offset).unwrap();
            let second = source.position_info(offset).unwrap();
            prop_assert_eq!(first.link(), second.link());
            prop_assert_eq!(first, second);
        }

        /// Property: offsets in a later file resolve to that file with file-local lines
        #[test]
        fn later_files_are_addressed_locally(first in "[a-z\n]{0,20}", second in "[a-z]{1,10}") {
            let source = Source::from_files([
                SourceFile::new("a.j", first.clone()),
                SourceFile::new("b.j", second.clone()),
            ]);
            let start = first.len() + 1;
            let info = source.position_info(start).unwrap();
            prop_assert_eq!(info.file.as_str(), "b.j");
            prop_assert_eq!(info.line, 1);
            prop_assert_eq!(info.column, 0);
            prop_assert_eq!(source.join().len(), first.len() + 1 + second.len());
        }
    }
}
