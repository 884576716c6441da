//! Line ending helpers.
//!
//! Text is indexed as-is: LF (`'\n'`), CR (`'\r'`) and CRLF (`"\r\n"`) all terminate a line,
//! and a CR directly followed by an LF forms a single two-character delimiter.

use crate::LineIndex;
use crate::source::TextSource;

/// Number of terminated lines inspected by [`LineEnding::detect`].
const DETECTION_LINE_LIMIT: usize = 20;

/// A newline sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
    /// Classic Mac OS CR (`'\r'`).
    Cr,
}

impl LineEnding {
    /// All line endings, in the order used to break ties during detection.
    pub const ALL: [LineEnding; 3] = [LineEnding::Lf, LineEnding::Crlf, LineEnding::Cr];

    /// The delimiter characters.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Length of the delimiter in characters.
    pub fn char_len(self) -> usize {
        self.symbol().len()
    }

    /// Parse a delimiter.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ending| ending.symbol() == symbol)
    }

    /// Detect the dominant line ending of an indexed text.
    ///
    /// Policy: looks at the delimiters of the first terminated lines (at most 20) and returns
    /// the most frequent one. Ties go to LF, then CRLF, then CR. Returns `None` if the text has
    /// no delimiter at all.
    pub fn detect<S: TextSource + ?Sized>(index: &LineIndex, source: &S) -> Option<Self> {
        let mut counts = [0usize; 3];
        let mut scanned = 0;
        for line in index.lines() {
            if scanned >= DETECTION_LINE_LIMIT {
                break;
            }
            let metadata = index.metadata(line);
            if metadata.delimiter_length == 0 {
                continue;
            }
            let start = index.line_location(line) + metadata.length();
            let Some(ending) = ending_at(source, start, metadata.delimiter_length) else {
                continue;
            };
            if let Some(slot) = Self::ALL.iter().position(|e| *e == ending) {
                counts[slot] += 1;
            }
            scanned += 1;
        }

        let mut best: Option<(LineEnding, usize)> = None;
        for (ending, count) in Self::ALL.into_iter().zip(counts) {
            if count > 0 && best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((ending, count));
            }
        }
        best.map(|(ending, _)| ending)
    }
}

fn ending_at<S: TextSource + ?Sized>(source: &S, start: usize, len: usize) -> Option<LineEnding> {
    let mut chars = source.chars_from(start);
    match (len, chars.next(), chars.next()) {
        (1, Some('\n'), _) => Some(LineEnding::Lf),
        (1, Some('\r'), _) => Some(LineEnding::Cr),
        (2, Some('\r'), Some('\n')) => Some(LineEnding::Crlf),
        _ => None,
    }
}

/// A delimiter found in a text, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreak {
    /// Offset of the delimiter's first character.
    pub start: usize,
    /// Length of the delimiter: 1 or 2.
    pub len: usize,
}

impl LineBreak {
    /// Offset just past the delimiter, where the next line starts.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Iterator over the delimiters of a text, see [`line_breaks`].
pub struct LineBreaks<I: Iterator<Item = char>> {
    chars: std::iter::Peekable<I>,
    offset: usize,
}

impl<I: Iterator<Item = char>> Iterator for LineBreaks<I> {
    type Item = LineBreak;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ch) = self.chars.next() {
            let start = self.offset;
            self.offset += 1;
            match ch {
                '\n' => return Some(LineBreak { start, len: 1 }),
                '\r' => {
                    if self.chars.next_if_eq(&'\n').is_some() {
                        self.offset += 1;
                        return Some(LineBreak { start, len: 2 });
                    }
                    return Some(LineBreak { start, len: 1 });
                }
                _ => {}
            }
        }
        None
    }
}

/// All delimiters at or after `from`, in order. CRLF is reported once, with length 2.
pub fn line_breaks<S: TextSource + ?Sized>(
    source: &S,
    from: usize,
) -> LineBreaks<impl Iterator<Item = char> + '_> {
    LineBreaks {
        chars: source.chars_from(from).peekable(),
        offset: from,
    }
}

/// The first delimiter at or after `from`.
pub fn next_line_break<S: TextSource + ?Sized>(source: &S, from: usize) -> Option<LineBreak> {
    line_breaks(source, from).next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LineIndexConfig;

    fn detect(text: &str) -> Option<LineEnding> {
        let index = LineIndex::from_source(text, LineIndexConfig::default());
        LineEnding::detect(&index, text)
    }

    #[test]
    fn test_symbols() {
        assert_eq!(LineEnding::Crlf.char_len(), 2);
        assert_eq!(LineEnding::from_symbol("\r"), Some(LineEnding::Cr));
        assert_eq!(LineEnding::from_symbol("\n\r"), None);
    }

    #[test]
    fn test_next_line_break() {
        let text = "ab\r\ncd\ref\n";
        assert_eq!(next_line_break(text, 0), Some(LineBreak { start: 2, len: 2 }));
        assert_eq!(next_line_break(text, 3), Some(LineBreak { start: 3, len: 1 }));
        assert_eq!(next_line_break(text, 4), Some(LineBreak { start: 6, len: 1 }));
        assert_eq!(next_line_break(text, 7), Some(LineBreak { start: 9, len: 1 }));
        assert_eq!(next_line_break(text, 10), None);
        assert_eq!(next_line_break("", 0), None);
    }

    #[test]
    fn test_line_breaks_counts_characters() {
        let breaks: Vec<LineBreak> = line_breaks("é\n日本\r\n", 0).collect();
        assert_eq!(
            breaks,
            vec![LineBreak { start: 1, len: 1 }, LineBreak { start: 4, len: 2 }]
        );
        assert_eq!(breaks[1].end(), 6);
    }

    #[test]
    fn test_detect_majority() {
        assert_eq!(detect("a\r\nb\r\nc\nd"), Some(LineEnding::Crlf));
        assert_eq!(detect("a\rb\rc"), Some(LineEnding::Cr));
        assert_eq!(detect("no delimiters"), None);
    }

    #[test]
    fn test_detect_tie_prefers_lf() {
        assert_eq!(detect("a\r\nb\n"), Some(LineEnding::Lf));
        assert_eq!(detect("a\rb\r\n"), Some(LineEnding::Crlf));
    }

    #[test]
    fn test_detect_only_scans_leading_lines() {
        let mut text = "x\n".repeat(20);
        text.push_str(&"y\r\n".repeat(30));
        assert_eq!(detect(&text), Some(LineEnding::Lf));
    }
}
