//! Read access to document text.
//!
//! [`LineIndex`](crate::LineIndex) does not own the text it indexes. When an edit is applied it
//! reads the already edited text through this trait, to measure byte lengths and to find line
//! delimiters. All offsets are in characters (Unicode scalar values).

use std::ops::Range;

use ropey::Rope;

/// A character-addressable view of a text.
///
/// The index reads each edited region with one [`chars_from`](Self::chars_from) pass. For
/// `str` and `String` that call still walks from the start of the string, so each edit costs
/// O(n); use [`Rope`] for large texts, where every method is O(log n) to reach the offset.
pub trait TextSource {
    /// Number of characters.
    fn len_chars(&self) -> usize;

    /// Character at `offset`, or `None` past the end.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Characters from `offset` to the end.
    fn chars_from(&self, offset: usize) -> impl Iterator<Item = char> + '_;

    /// UTF-8 length of the characters in `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not within `0..=len_chars()`.
    fn byte_len(&self, range: Range<usize>) -> usize;
}

impl TextSource for str {
    fn len_chars(&self) -> usize {
        self.chars().count()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.chars().nth(offset)
    }

    fn chars_from(&self, offset: usize) -> impl Iterator<Item = char> + '_ {
        self.chars().skip(offset)
    }

    fn byte_len(&self, range: Range<usize>) -> usize {
        assert!(range.start <= range.end, "inverted character range {range:?}");
        let mut chars = self.chars();
        for _ in 0..range.start {
            assert!(chars.next().is_some(), "character range {range:?} out of bounds");
        }
        let mut bytes = 0;
        for _ in range.clone() {
            match chars.next() {
                Some(ch) => bytes += ch.len_utf8(),
                None => panic!("character range {range:?} out of bounds"),
            }
        }
        bytes
    }
}

impl TextSource for String {
    fn len_chars(&self) -> usize {
        self.as_str().len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.as_str().char_at(offset)
    }

    fn chars_from(&self, offset: usize) -> impl Iterator<Item = char> + '_ {
        self.as_str().chars_from(offset)
    }

    fn byte_len(&self, range: Range<usize>) -> usize {
        self.as_str().byte_len(range)
    }
}

impl TextSource for Rope {
    fn len_chars(&self) -> usize {
        Rope::len_chars(self)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.get_char(offset)
    }

    fn chars_from(&self, offset: usize) -> impl Iterator<Item = char> + '_ {
        self.chars_at(offset)
    }

    fn byte_len(&self, range: Range<usize>) -> usize {
        self.char_to_byte(range.end) - self.char_to_byte(range.start)
    }
}

impl<T: TextSource + ?Sized> TextSource for &T {
    fn len_chars(&self) -> usize {
        (**self).len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        (**self).char_at(offset)
    }

    fn chars_from(&self, offset: usize) -> impl Iterator<Item = char> + '_ {
        (**self).chars_from(offset)
    }

    fn byte_len(&self, range: Range<usize>) -> usize {
        (**self).byte_len(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_and_rope_agree() {
        let text = "añb\r\n日本\n";
        let rope = Rope::from_str(text);
        assert_eq!(text.len_chars(), 8);
        assert_eq!(TextSource::len_chars(&rope), 8);
        for offset in 0..=8 {
            assert_eq!(text.char_at(offset), TextSource::char_at(&rope, offset));
        }
        assert_eq!(text.byte_len(0..3), 4);
        assert_eq!(rope.byte_len(0..3), 4);
        assert_eq!(text.byte_len(5..7), 6);
        assert_eq!(rope.byte_len(5..7), 6);
        assert_eq!(text.byte_len(8..8), 0);
        assert!(text.chars_from(5).eq(TextSource::chars_from(&rope, 5)));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_str_range_past_end_panics() {
        "abc".byte_len(1..5);
    }
}
