//! Property-based tests: after every random edit the incrementally maintained index must match
//! an index rebuilt from scratch over the same text.

use linetree::{Document, LineId, LineIndex, LineIndexConfig};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

#[derive(Clone, Debug)]
enum EditOp {
    Insert { pos_pct: f64, text: String },
    Remove { start_pct: f64, len: usize },
    Replace { start_pct: f64, len: usize, text: String },
}

/// Short fragments over an alphabet rich in delimiters and multi-byte characters.
fn fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['a', 'é', '日', '\n', '\r']), 0..8)
        .prop_map(|chars| chars.into_iter().collect())
}

fn arbitrary_edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        3 => (0.0..=1.0f64, fragment())
            .prop_map(|(pos_pct, text)| EditOp::Insert { pos_pct, text }),
        2 => (0.0..=1.0f64, 0..6usize)
            .prop_map(|(start_pct, len)| EditOp::Remove { start_pct, len }),
        1 => (0.0..=1.0f64, 0..4usize, fragment())
            .prop_map(|(start_pct, len, text)| EditOp::Replace { start_pct, len, text }),
    ]
}

fn range_at(doc: &Document, start_pct: f64, len: usize) -> std::ops::Range<usize> {
    let char_count = doc.char_count();
    let start = ((start_pct * char_count as f64) as usize).min(char_count);
    start..(start + len).min(char_count)
}

/// (total length, delimiter length, byte count) of every line.
fn shapes(index: &LineIndex) -> Vec<(usize, usize, usize)> {
    index
        .lines()
        .map(|line| {
            let metadata = index.metadata(line);
            (metadata.total_length, metadata.delimiter_length, metadata.byte_count)
        })
        .collect()
}

fn contents(doc: &Document) -> FxHashMap<LineId, String> {
    let index = doc.line_index();
    index
        .lines()
        .enumerate()
        .map(|(row, line)| (line, doc.line_text(row).unwrap().to_string()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn incremental_index_matches_rebuild(
        initial in fragment(),
        ops in prop::collection::vec(arbitrary_edit_op(), 1..40),
    ) {
        let mut doc = Document::new(&initial);
        for op in &ops {
            let before = contents(&doc);
            let changes = match op {
                EditOp::Insert { pos_pct, text } => {
                    let at = range_at(&doc, *pos_pct, 0).start;
                    doc.insert_text(text, at).unwrap()
                }
                EditOp::Remove { start_pct, len } => {
                    let range = range_at(&doc, *start_pct, *len);
                    doc.remove_text(range).unwrap()
                }
                EditOp::Replace { start_pct, len, text } => {
                    let range = range_at(&doc, *start_pct, *len);
                    doc.replace_text(range, text).unwrap()
                }
            };

            let index = doc.line_index();
            index.validate().unwrap();
            let text = doc.text().to_string();
            let rebuilt = LineIndex::from_source(text.as_str(), LineIndexConfig::default());
            prop_assert_eq!(shapes(index), shapes(&rebuilt));
            prop_assert_eq!(index.byte_count(), text.len());
            prop_assert_eq!(index.content_height(), rebuilt.content_height());

            for line in changes.removed_lines() {
                prop_assert!(!index.contains(*line));
            }
            for line in changes.inserted_lines().iter().chain(changes.edited_lines()) {
                prop_assert!(index.contains(*line));
            }
            // Lines the change set does not mention keep their text.
            let after = contents(&doc);
            for (line, text) in &after {
                let touched = changes.inserted_lines().contains(line)
                    || changes.edited_lines().contains(line);
                if !touched {
                    prop_assert_eq!(before.get(line), Some(text));
                }
            }
        }
    }

    #[test]
    fn positions_round_trip(text in fragment(), extra in fragment()) {
        let text = format!("{text}{extra}{text}");
        let index = LineIndex::from_source(text.as_str(), LineIndexConfig::default());
        for offset in 0..=index.char_count() {
            let position = index.line_position(offset).unwrap();
            prop_assert_eq!(index.location(position), Some(offset));
        }
        prop_assert_eq!(index.line_position(index.char_count() + 1), None);
    }
}
