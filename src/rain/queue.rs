//! Spawn queue: pending letters and words awaiting a free column.
//!
//! Incoming text is split according to the display mode and sanitized at
//! the door: only single-cell characters survive, because a frame cell
//! holds exactly one terminal column. Queued items leave only when placed
//! (or, for whitespace letters, when the drain discards them).

use std::collections::VecDeque;

use log::debug;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use crate::config::DisplayMode;

/// FIFO backlog of text awaiting placement.
#[derive(Debug, Clone, Default)]
pub struct SpawnQueue {
    letters: VecDeque<char>,
    words: VecDeque<String>,
}

/// Accept a grapheme only if it is one `char` wide and one cell wide.
fn single_cell_char(grapheme: &str) -> Option<char> {
    let mut chars = grapheme.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    (ch.width() == Some(1)).then_some(ch)
}

impl SpawnQueue {
    /// A fresh empty queue pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `text` per `mode` and append to the matching queue.
    ///
    /// Letters mode queues individual characters, whitespace included (the
    /// drain discards those). Words and sentences modes queue
    /// whitespace-delimited tokens. Multi-cell characters are dropped.
    pub fn push_text(&mut self, text: &str, mode: DisplayMode) {
        match mode {
            DisplayMode::Letters => {
                for grapheme in text.graphemes(true) {
                    if let Some(ch) = single_cell_char(grapheme) {
                        self.letters.push_back(ch);
                    } else {
                        debug!("dropping multi-cell grapheme {grapheme:?}");
                    }
                }
            }
            DisplayMode::Words | DisplayMode::Sentences => {
                for token in text.split_whitespace() {
                    let word: String = token.graphemes(true).filter_map(single_cell_char).collect();
                    if word.is_empty() {
                        debug!("dropping token {token:?} with no single-cell glyphs");
                    } else {
                        self.words.push_back(word);
                    }
                }
            }
        }
    }

    /// Next pending letter, without consuming it.
    pub fn front_letter(&self) -> Option<char> {
        self.letters.front().copied()
    }

    /// Consume the front letter.
    pub fn pop_letter(&mut self) -> Option<char> {
        self.letters.pop_front()
    }

    /// Next pending word, without consuming it.
    pub fn front_word(&self) -> Option<&str> {
        self.words.front().map(String::as_str)
    }

    /// Consume the front word.
    pub fn pop_word(&mut self) -> Option<String> {
        self.words.pop_front()
    }

    /// Number of letters waiting.
    pub fn letters_pending(&self) -> usize {
        self.letters.len()
    }

    /// Number of words waiting.
    pub fn words_pending(&self) -> usize {
        self.words.len()
    }

    /// True when nothing is waiting in either queue.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty() && self.words.is_empty()
    }
}
