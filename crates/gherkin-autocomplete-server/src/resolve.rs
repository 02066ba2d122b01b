//! Qualified-name resolution around a cursor position.
//!
//! A completion request hands the server a single word, but the identifier
//! the user is typing may be a dotted chain such as `foo.bar.baz`. Starting
//! from the word's range within its line, the resolver inspects the single
//! character adjacent to the range: when it is a `.`, the word touching that
//! dot is consumed, the scan boundary moves past it, and the walk continues
//! in the same direction. Any other character terminates the walk.
//!
//! The scan is an explicit loop with an accumulator, so a pathological line
//! of thousands of chained dots costs iterations, not stack depth. All
//! offsets are character indices within the line.

/// Scan direction for qualified-name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Walk towards the start of the line.
    Left,
    /// Walk towards the end of the line.
    Right,
}

/// Character range of a word within a line; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordRange {
    /// Index of the first character of the word.
    pub start: usize,
    /// Index one past the last character of the word.
    pub end: usize,
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn slice(chars: &[char], range: WordRange) -> String {
    chars
        .get(range.start..range.end)
        .unwrap_or(&[])
        .iter()
        .collect()
}

/// Resolve the word range containing a cursor position within a line.
///
/// A cursor sitting immediately after a word still resolves to that word,
/// matching editor word-range semantics. Returns `None` when the position
/// touches no word character.
#[must_use]
pub fn word_range_at(line: &str, character: usize) -> Option<WordRange> {
    let chars: Vec<char> = line.chars().collect();
    let anchor = if chars.get(character).copied().is_some_and(is_word_char) {
        character
    } else if character > 0
        && chars
            .get(character.wrapping_sub(1))
            .copied()
            .is_some_and(is_word_char)
    {
        character - 1
    } else {
        return None;
    };

    let mut start = anchor;
    while start > 0 && chars.get(start - 1).copied().is_some_and(is_word_char) {
        start -= 1;
    }
    let mut end = anchor + 1;
    while chars.get(end).copied().is_some_and(is_word_char) {
        end += 1;
    }
    Some(WordRange { start, end })
}

/// The word ending immediately before the character at `boundary`.
fn word_before(chars: &[char], boundary: usize) -> Option<WordRange> {
    let end = boundary;
    let mut start = end;
    while start > 0 && chars.get(start - 1).copied().is_some_and(is_word_char) {
        start -= 1;
    }
    (start < end).then_some(WordRange { start, end })
}

/// The word starting at the character at `from`.
fn word_after(chars: &[char], from: usize) -> Option<WordRange> {
    let start = from;
    let mut end = start;
    while chars.get(end).copied().is_some_and(is_word_char) {
        end += 1;
    }
    (end > start).then_some(WordRange { start, end })
}

/// Collect the dot-adjacent words on one side of a range, nearest first
/// for the right scan and left-to-right order for the left scan.
fn adjoining_words(chars: &[char], range: WordRange, direction: Direction) -> Vec<String> {
    let mut words = Vec::new();
    match direction {
        Direction::Left => {
            let mut start = range.start;
            // At the start of the line there is nothing to inspect.
            while start > 0 && chars.get(start - 1).copied() == Some('.') {
                let Some(word) = word_before(chars, start - 1) else {
                    break;
                };
                words.push(slice(chars, word));
                start = word.start;
            }
            words.reverse();
        }
        Direction::Right => {
            let mut end = range.end;
            while chars.get(end).copied() == Some('.') {
                let Some(word) = word_after(chars, end + 1) else {
                    break;
                };
                words.push(slice(chars, word));
                end = word.end;
            }
        }
    }
    words
}

/// Extend a word across adjacent dot separators in one direction.
///
/// Returns the accumulated dotted name, or the word unchanged when the
/// adjacent character is not a dot (including at the start of the line).
#[must_use]
pub fn resolve_qualified_name(line: &str, range: WordRange, direction: Direction) -> String {
    let chars: Vec<char> = line.chars().collect();
    let token = slice(&chars, range);
    let words = adjoining_words(&chars, range, direction);
    if words.is_empty() {
        return token;
    }
    match direction {
        Direction::Left => format!("{}.{token}", words.join(".")),
        Direction::Right => format!("{token}.{}", words.join(".")),
    }
}

/// Assemble the complete dotted name spanning the cursor word.
///
/// Equivalent to resolving left and then right from the same range: for the
/// line `foo.bar.baz` with the cursor on `bar`, this yields `foo.bar.baz`.
#[must_use]
pub fn fully_qualified(line: &str, range: WordRange) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut parts = adjoining_words(&chars, range, Direction::Left);
    parts.push(slice(&chars, range));
    parts.extend(adjoining_words(&chars, range, Direction::Right));
    parts.join(".")
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn range_of(line: &str, word: &str) -> WordRange {
        let start = line.find(word).expect("word should be present in line");
        let start = line
            .char_indices()
            .position(|(byte, _)| byte == start)
            .expect("start should fall on a char boundary");
        WordRange {
            start,
            end: start + word.chars().count(),
        }
    }

    #[rstest]
    #[case("foo.bar.baz", "bar", Direction::Left, "foo.bar")]
    #[case("foo.bar.baz", "bar", Direction::Right, "bar.baz")]
    #[case("foo.bar.baz", "baz", Direction::Left, "foo.bar.baz")]
    #[case("foo.bar.baz", "foo", Direction::Right, "foo.bar.baz")]
    #[case("foo bar", "bar", Direction::Left, "bar")]
    #[case("foo bar", "foo", Direction::Right, "foo")]
    fn resolves_across_dot_separators(
        #[case] line: &str,
        #[case] word: &str,
        #[case] direction: Direction,
        #[case] expected: &str,
    ) {
        let range = range_of(line, word);
        assert_eq!(resolve_qualified_name(line, range, direction), expected);
    }

    #[test]
    fn left_scan_at_line_start_returns_word_unchanged() {
        let line = "foo.bar";
        let range = range_of(line, "foo");
        assert_eq!(range.start, 0);
        assert_eq!(
            resolve_qualified_name(line, range, Direction::Left),
            "foo"
        );
    }

    #[test]
    fn dangling_dot_without_word_terminates_scan() {
        let line = ".foo";
        let range = range_of(line, "foo");
        assert_eq!(
            resolve_qualified_name(line, range, Direction::Left),
            "foo"
        );
    }

    #[test]
    fn fully_qualified_combines_both_directions() {
        let line = "    call foo.bar.baz now";
        let range = range_of(line, "bar");
        assert_eq!(fully_qualified(line, range), "foo.bar.baz");
    }

    #[test]
    fn fully_qualified_of_plain_word_is_the_word() {
        let line = "Given a user";
        let range = range_of(line, "user");
        assert_eq!(fully_qualified(line, range), "user");
    }

    #[test]
    fn long_chain_resolves_iteratively() {
        let chain = vec!["seg"; 500].join(".");
        let line = format!("{chain} end");
        let range = WordRange { start: 0, end: 3 };
        let resolved = resolve_qualified_name(&line, range, Direction::Right);
        assert_eq!(resolved, chain);
    }

    #[rstest]
    #[case("foo.bar", 5, Some("bar"))]
    #[case("foo.bar", 7, Some("bar"))] // cursor just past the word
    #[case("foo.bar", 3, Some("foo"))] // cursor on the dot, word to the left
    #[case("   ", 1, None)]
    #[case("", 0, None)]
    fn word_range_at_matches_editor_semantics(
        #[case] line: &str,
        #[case] character: usize,
        #[case] expected: Option<&str>,
    ) {
        let range = word_range_at(line, character);
        let found = range.map(|r| {
            let chars: Vec<char> = line.chars().collect();
            slice(&chars, r)
        });
        assert_eq!(found.as_deref(), expected);
    }

    #[test]
    fn word_range_at_handles_unicode_words() {
        let line = "Étant donné.créé";
        let character = line.chars().count() - 1;
        let range = word_range_at(line, character).expect("word at cursor");
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(slice(&chars, range), "créé");
        assert_eq!(
            resolve_qualified_name(line, range, Direction::Left),
            "donné.créé"
        );
    }
}
