//! Streaming recognisers for typed cheat codes.
//!
//! Every sequence sees every key. A sequence is a fixed lowercase string
//! optionally followed by a number of free parameter characters; once the
//! last parameter arrives the sequence reports them and starts over.

use crate::domain::player::PowerType;

pub const MAX_CHEAT_PARAMS: usize = 2;

#[derive(Clone, Debug)]
pub struct CheatSequence {
    sequence: &'static [u8],
    param_count: usize,
    cursor: usize,
    params: Vec<char>,
}

impl CheatSequence {
    pub fn new(sequence: &'static str, param_count: usize) -> Self {
        debug_assert!(!sequence.is_empty());
        debug_assert!(param_count <= MAX_CHEAT_PARAMS);
        CheatSequence {
            sequence: sequence.as_bytes(),
            param_count,
            cursor: 0,
            params: Vec::with_capacity(param_count),
        }
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.params.clear();
    }

    /// How far into the fixed part the matcher is.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Feed one key. Returns the captured parameters when the sequence
    /// completes.
    pub fn feed(&mut self, key: char) -> Option<Vec<char>> {
        let key = key.to_ascii_lowercase();

        if self.cursor < self.sequence.len() {
            if self.expects(self.cursor, key) {
                self.cursor += 1;
            } else {
                // Restart, giving this key a chance at the first position.
                self.cursor = usize::from(self.expects(0, key));
            }
            self.params.clear();
        } else if self.params.len() < self.param_count {
            self.params.push(key);
        }

        if self.cursor >= self.sequence.len() && self.params.len() >= self.param_count {
            let params = std::mem::take(&mut self.params);
            self.reset();
            return Some(params);
        }
        None
    }

    fn expects(&self, pos: usize, key: char) -> bool {
        key.is_ascii() && self.sequence[pos] == key as u8
    }
}

// ── The cheat list ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CheatKind {
    God,
    AmmoNoKeys,
    AmmoAndKeys,
    Music,
    NoClip,
    /// `idclip`, the second-game spelling of no-clip.
    NoClipCommercial,
    Power(PowerType),
    PowerMenu,
    Choppers,
    MyPos,
    LevelWarp,
}

/// All configured sequences, in check order.
pub struct CheatBook {
    entries: Vec<(CheatKind, CheatSequence)>,
}

impl CheatBook {
    pub fn new() -> Self {
        let mut entries = vec![
            (CheatKind::God, CheatSequence::new("iddqd", 0)),
            (CheatKind::AmmoNoKeys, CheatSequence::new("idfa", 0)),
            (CheatKind::AmmoAndKeys, CheatSequence::new("idkfa", 0)),
            (CheatKind::Music, CheatSequence::new("idmus", 2)),
            (CheatKind::NoClip, CheatSequence::new("idspispopd", 0)),
            (CheatKind::NoClipCommercial, CheatSequence::new("idclip", 0)),
        ];
        for (power, seq) in [
            (PowerType::Invulnerability, "idbeholdv"),
            (PowerType::Strength, "idbeholds"),
            (PowerType::Invisibility, "idbeholdi"),
            (PowerType::IronFeet, "idbeholdr"),
            (PowerType::AllMap, "idbeholda"),
            (PowerType::Infrared, "idbeholdl"),
        ] {
            entries.push((CheatKind::Power(power), CheatSequence::new(seq, 0)));
        }
        entries.extend([
            (CheatKind::PowerMenu, CheatSequence::new("idbehold", 0)),
            (CheatKind::Choppers, CheatSequence::new("idchoppers", 0)),
            (CheatKind::LevelWarp, CheatSequence::new("idclev", 2)),
            (CheatKind::MyPos, CheatSequence::new("idmypos", 0)),
        ]);
        CheatBook { entries }
    }

    /// Feed one key to every sequence; returns those that completed.
    pub fn feed(&mut self, key: char) -> Vec<(CheatKind, Vec<char>)> {
        self.entries
            .iter_mut()
            .filter_map(|(kind, seq)| seq.feed(key).map(|params| (*kind, params)))
            .collect()
    }

    pub fn reset(&mut self) {
        for (_, seq) in self.entries.iter_mut() {
            seq.reset();
        }
    }
}

impl Default for CheatBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_str(seq: &mut CheatSequence, text: &str) -> Vec<Vec<char>> {
        text.chars().filter_map(|c| seq.feed(c)).collect()
    }

    fn book_hits(book: &mut CheatBook, text: &str) -> Vec<CheatKind> {
        text.chars()
            .flat_map(|c| book.feed(c))
            .map(|(kind, _)| kind)
            .collect()
    }

    // ── Matcher ──

    #[test]
    fn exact_sequence_completes_once() {
        let mut seq = CheatSequence::new("iddqd", 0);
        assert_eq!(feed_str(&mut seq, "iddqd").len(), 1);
        assert_eq!(seq.cursor(), 0);
    }

    #[test]
    fn broken_prefix_then_full_sequence() {
        let mut seq = CheatSequence::new("iddqd", 0);
        assert!(feed_str(&mut seq, "idd").is_empty());
        assert!(feed_str(&mut seq, "qx").is_empty());
        assert_eq!(feed_str(&mut seq, "iddqd").len(), 1);
    }

    #[test]
    fn back_to_back_sequences_both_complete() {
        let mut seq = CheatSequence::new("iddqd", 0);
        assert_eq!(feed_str(&mut seq, "iddqdiddqd").len(), 2);
    }

    #[test]
    fn mismatching_key_restarts_at_first_char() {
        let mut seq = CheatSequence::new("iddqd", 0);
        assert_eq!(feed_str(&mut seq, "iiddqd").len(), 1);
        assert_eq!(feed_str(&mut seq, "idiiddqd").len(), 1);
    }

    #[test]
    fn matching_ignores_case() {
        let mut seq = CheatSequence::new("iddqd", 0);
        assert_eq!(feed_str(&mut seq, "IdDqD").len(), 1);
    }

    #[test]
    fn parameters_are_captured() {
        let mut seq = CheatSequence::new("idclev", 2);
        assert!(feed_str(&mut seq, "idclev1").is_empty());
        assert_eq!(feed_str(&mut seq, "3"), vec![vec!['1', '3']]);
    }

    #[test]
    fn parameters_are_free_characters() {
        let mut seq = CheatSequence::new("idmus", 2);
        assert_eq!(feed_str(&mut seq, "idmusid"), vec![vec!['i', 'd']]);
    }

    #[test]
    fn non_ascii_key_resets() {
        let mut seq = CheatSequence::new("iddqd", 0);
        assert!(feed_str(&mut seq, "idd\u{e9}qd").is_empty());
        assert_eq!(seq.cursor(), 0);
    }

    // ── Book ──

    #[test]
    fn book_recognises_overlapping_codes() {
        let mut book = CheatBook::new();
        assert_eq!(book_hits(&mut book, "idkfa"), vec![CheatKind::AmmoAndKeys]);
        assert_eq!(book_hits(&mut book, "idfa"), vec![CheatKind::AmmoNoKeys]);
    }

    #[test]
    fn behold_menu_then_choice() {
        let mut book = CheatBook::new();
        assert_eq!(book_hits(&mut book, "idbehold"), vec![CheatKind::PowerMenu]);
        assert_eq!(
            book_hits(&mut book, "s"),
            vec![CheatKind::Power(PowerType::Strength)]
        );
        assert_eq!(
            book_hits(&mut book, "idbeholdr"),
            vec![CheatKind::PowerMenu, CheatKind::Power(PowerType::IronFeet)]
        );
    }

    #[test]
    fn book_reset_drops_progress() {
        let mut book = CheatBook::new();
        book_hits(&mut book, "iddq");
        book.reset();
        assert!(book_hits(&mut book, "d").is_empty());
    }
}
