//! Shared utilities for LSP position handling.
//!
//! LSP positions count columns in UTF-16 code units, while the resolver
//! works in character offsets within a line. These helpers bridge the two
//! without either module depending on the other.

/// Calculate UTF-16 code units for a character.
///
/// BMP characters (code points ≤ 0xFFFF) use 1 UTF-16 code unit.
/// Non-BMP characters (code points > 0xFFFF) use 2 UTF-16 code units
/// (surrogate pair).
///
/// # Examples
///
/// ```
/// use gherkin_autocomplete_server::util::utf16_code_units;
///
/// assert_eq!(utf16_code_units('a'), 1);
/// assert_eq!(utf16_code_units('é'), 1); // U+00E9, BMP
/// assert_eq!(utf16_code_units('😀'), 2); // U+1F600, non-BMP
/// ```
#[inline]
#[must_use]
pub fn utf16_code_units(ch: char) -> u32 {
    if u32::from(ch) <= 0xFFFF { 1 } else { 2 }
}

/// Convert an LSP UTF-16 column to a character index within a line.
///
/// Positions beyond the end of the line clamp to the line's character
/// count, matching how editors treat a cursor past the final character.
///
/// # Examples
///
/// ```
/// use gherkin_autocomplete_server::util::utf16_col_to_char_index;
///
/// assert_eq!(utf16_col_to_char_index("Given a step", 6), 6);
/// // "é" is 1 UTF-16 unit and 1 character; "😀" is 2 units but 1 character.
/// assert_eq!(utf16_col_to_char_index("a😀b", 3), 2);
/// ```
#[must_use]
pub fn utf16_col_to_char_index(line: &str, utf16_col: u32) -> usize {
    let mut units = 0u32;
    for (index, ch) in line.chars().enumerate() {
        if units >= utf16_col {
            return index;
        }
        units += utf16_code_units(ch);
    }
    line.chars().count()
}

/// Return the 0-based line of a source text, without its line terminator.
#[must_use]
pub fn line_at(source: &str, line_0: usize) -> Option<&str> {
    source.lines().nth(line_0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf16_code_units_ascii_and_bmp() {
        assert_eq!(utf16_code_units('a'), 1);
        assert_eq!(utf16_code_units('é'), 1);
        assert_eq!(utf16_code_units('日'), 1);
    }

    #[test]
    fn utf16_code_units_non_bmp() {
        assert_eq!(utf16_code_units('😀'), 2);
        assert_eq!(utf16_code_units('🦀'), 2);
    }

    #[test]
    fn char_index_matches_column_for_ascii() {
        let line = "Given a user";
        assert_eq!(utf16_col_to_char_index(line, 0), 0);
        assert_eq!(utf16_col_to_char_index(line, 6), 6);
        assert_eq!(utf16_col_to_char_index(line, 12), 12);
    }

    #[test]
    fn char_index_accounts_for_surrogate_pairs() {
        let line = "a😀b";
        // Columns: a=0, 😀=1..3, b=3.
        assert_eq!(utf16_col_to_char_index(line, 1), 1);
        assert_eq!(utf16_col_to_char_index(line, 3), 2);
    }

    #[test]
    fn char_index_clamps_past_end_of_line() {
        assert_eq!(utf16_col_to_char_index("abc", 99), 3);
        assert_eq!(utf16_col_to_char_index("", 4), 0);
    }

    #[test]
    fn line_at_returns_requested_line() {
        let source = "first\nsecond\nthird";
        assert_eq!(line_at(source, 1), Some("second"));
        assert_eq!(line_at(source, 3), None);
    }
}
