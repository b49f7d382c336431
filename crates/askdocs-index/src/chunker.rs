//! Separator-aware text splitting into overlapping passages.
//!
//! Splitting walks the text with a sliding window of at most
//! `chunk_size` characters. Each window end is snapped backwards onto
//! the coarsest separator available inside the window: a paragraph
//! break first, then a line break, then sentence punctuation, then a
//! space, and only when none of those exist does the window cut
//! mid-word. The next window starts `chunk_overlap` characters before
//! the previous end, so consecutive passages share exactly that many
//! characters.

use crate::error::{IndexError, IndexResult};
use askdocs_core::{Passage, RawDocument};
use std::collections::HashMap;
use tracing::debug;

/// Sentence-ending characters recognized by the splitter. Includes the
/// CJK full stop so prose in either script breaks at sentence ends.
const SENTENCE_ENDINGS: &[char] = &['。', '.', '!', '?', '！', '？'];

/// Chunking parameters, measured in characters.
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            chunk_size: 300,
            chunk_overlap: 50,
        }
    }
}

/// Splits extracted text into overlapping passages.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter, rejecting configurations where the overlap
    /// would prevent the window from advancing.
    pub fn new(config: SplitConfig) -> IndexResult<Self> {
        if config.chunk_size == 0 || config.chunk_overlap >= config.chunk_size {
            return Err(IndexError::InvalidChunking {
                size: config.chunk_size,
                overlap: config.chunk_overlap,
            });
        }
        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        })
    }

    /// Split one text into pieces of at most `chunk_size` characters.
    /// Whitespace-only pieces are dropped.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::new();
        let mut start = 0usize;

        while start < chars.len() {
            let remaining = chars.len() - start;
            if remaining <= self.chunk_size {
                push_piece(&mut pieces, &chars[start..]);
                break;
            }

            let end = self.snap_boundary(&chars, start);
            push_piece(&mut pieces, &chars[start..end]);
            start = end - self.chunk_overlap;
        }

        pieces
    }

    /// Pick the end of the window starting at `start`. The window must
    /// advance past the overlap region, so candidate ends are searched
    /// in `(start + chunk_overlap, start + chunk_size]`, latest
    /// occurrence first, coarsest separator class first.
    fn snap_boundary(&self, chars: &[char], start: usize) -> usize {
        let hard_end = start + self.chunk_size;
        let min_end = start + self.chunk_overlap + 1;

        // Paragraph break: cut just after "\n\n".
        for end in (min_end..=hard_end).rev() {
            if end >= start + 2 && chars[end - 1] == '\n' && chars[end - 2] == '\n' {
                return end;
            }
        }
        // Line break.
        for end in (min_end..=hard_end).rev() {
            if chars[end - 1] == '\n' {
                return end;
            }
        }
        // Sentence ending.
        for end in (min_end..=hard_end).rev() {
            if SENTENCE_ENDINGS.contains(&chars[end - 1]) {
                return end;
            }
        }
        // Word boundary.
        for end in (min_end..=hard_end).rev() {
            if chars[end - 1] == ' ' {
                return end;
            }
        }

        hard_end
    }

    /// Split a set of extracted documents into passages. Sequence
    /// indices count up per source file, continuing across the pages or
    /// rows of the same file.
    pub fn split_documents(&self, documents: &[RawDocument]) -> Vec<Passage> {
        let mut counters: HashMap<&str, usize> = HashMap::new();
        let mut passages = Vec::new();

        for doc in documents {
            for piece in self.split_text(&doc.text) {
                let counter = counters.entry(doc.source_path.as_str()).or_insert(0);
                passages.push(Passage {
                    text: piece,
                    source_path: doc.source_path.clone(),
                    page_or_row: doc.page_or_row,
                    sequence_index: *counter,
                });
                *counter += 1;
            }
        }

        debug!(
            "Split {} documents into {} passages",
            documents.len(),
            passages.len()
        );

        passages
    }
}

fn push_piece(pieces: &mut Vec<String>, chars: &[char]) {
    if chars.iter().any(|c| !c.is_whitespace()) {
        pieces.push(chars.iter().collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(size: usize, overlap: usize) -> TextSplitter {
        TextSplitter::new(SplitConfig {
            chunk_size: size,
            chunk_overlap: overlap,
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(matches!(
            TextSplitter::new(SplitConfig {
                chunk_size: 100,
                chunk_overlap: 100,
            }),
            Err(IndexError::InvalidChunking { .. })
        ));
        assert!(TextSplitter::new(SplitConfig {
            chunk_size: 100,
            chunk_overlap: 99,
        })
        .is_ok());
    }

    #[test]
    fn test_short_text_is_one_piece() {
        let s = splitter(200, 30);
        let pieces = s.split_text("short text");
        assert_eq!(pieces, vec!["short text".to_string()]);
    }

    #[test]
    fn test_empty_and_whitespace_texts_yield_nothing() {
        let s = splitter(200, 30);
        assert!(s.split_text("").is_empty());
        assert!(s.split_text("   \n\n  \t ").is_empty());
    }

    #[test]
    fn test_separator_free_text_hard_cuts() {
        // 1000 characters with no separators at all: the window
        // advances by size - overlap each step, so we expect
        // ceil(1000 / 170) = 6 pieces sharing exactly 30 characters.
        let text = "a".repeat(400) + &"b".repeat(300) + &"c".repeat(300);
        let s = splitter(200, 30);
        let pieces = s.split_text(&text);

        assert_eq!(pieces.len(), 6);
        for piece in &pieces {
            assert!(piece.chars().count() <= 200);
        }
        for pair in pieces.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let next: Vec<char> = pair[1].chars().collect();
            assert_eq!(&prev[prev.len() - 30..], &next[..30]);
        }

        let joined_len: usize = pieces.iter().map(|p| p.chars().count()).sum();
        assert_eq!(joined_len, 1000 + 5 * 30);
    }

    #[test]
    fn test_prefers_paragraph_break_over_finer_separators() {
        // A paragraph break, a line break, and a space all fall inside
        // the first window; the paragraph break must win even though
        // the others occur later.
        let text = format!("{}\n\n{}\n{} {}", "x".repeat(50), "y".repeat(20), "z".repeat(15), "w".repeat(60));
        let s = splitter(100, 10);
        let pieces = s.split_text(&text);
        assert_eq!(pieces[0], format!("{}\n\n", "x".repeat(50)));
    }

    #[test]
    fn test_prefers_line_break_over_sentence_and_space() {
        let text = format!("one. two three\n{}", "q".repeat(100));
        let s = splitter(30, 5);
        let pieces = s.split_text(&text);
        assert_eq!(pieces[0], "one. two three\n");
    }

    #[test]
    fn test_sentence_break_used_when_no_newline() {
        let text = format!("First sentence. Second one here. {}", "m".repeat(100));
        let s = splitter(40, 5);
        let pieces = s.split_text(&text);
        assert!(pieces[0].ends_with('.'), "got {:?}", pieces[0]);
    }

    #[test]
    fn test_cjk_full_stop_is_a_sentence_ending() {
        let text = format!("これは文です。{}", "漢".repeat(60));
        let s = splitter(20, 4);
        let pieces = s.split_text(&text);
        assert_eq!(pieces[0], "これは文です。");
    }

    #[test]
    fn test_boundary_never_lands_inside_overlap() {
        // A space right after the window start must not be chosen as a
        // boundary: that would make the next window start before the
        // current one.
        let text = format!("ab cd{}", "e".repeat(100));
        let s = splitter(20, 10);
        let pieces = s.split_text(&text);
        for pair in pieces.windows(2) {
            assert!(pair[1].chars().count() > 10);
        }
        let total: usize = pieces.iter().map(|p| p.chars().count()).sum();
        assert!(total >= text.chars().count());
    }

    #[test]
    fn test_all_pieces_within_chunk_size() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        let s = splitter(120, 20);
        for piece in s.split_text(&text) {
            assert!(piece.chars().count() <= 120);
        }
    }

    #[test]
    fn test_split_documents_sequences_per_source() {
        let s = splitter(50, 10);
        let long = "alpha beta gamma delta ".repeat(10);
        let docs = vec![
            RawDocument::new(long.clone(), "a.pdf").with_page_or_row(1),
            RawDocument::new(long.clone(), "a.pdf").with_page_or_row(2),
            RawDocument::new("tiny", "b.txt"),
        ];
        let passages = s.split_documents(&docs);

        let a_indices: Vec<usize> = passages
            .iter()
            .filter(|p| p.source_path == "a.pdf")
            .map(|p| p.sequence_index)
            .collect();
        assert_eq!(a_indices, (0..a_indices.len()).collect::<Vec<_>>());

        let b: Vec<&Passage> = passages.iter().filter(|p| p.source_path == "b.txt").collect();
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].sequence_index, 0);
        assert_eq!(b[0].page_or_row, None);

        let page_two = passages
            .iter()
            .find(|p| p.source_path == "a.pdf" && p.page_or_row == Some(2));
        assert!(page_two.is_some());
    }
}
