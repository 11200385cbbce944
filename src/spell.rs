//! The fixed spell table and the letters that drive trail discovery.

use serde::{Deserialize, Serialize};

/// Transparent symbol: contributes no letter to a spelled trail and allows a
/// perpendicular bend at its cell.
pub const WILDCARD: char = 'X';

/// Marker for an empty tile. Empty tiles spell nothing until the write spell
/// assigns them a symbol.
pub const EMPTY: char = '_';

/// Letters the write spell may always produce, whether or not they occur on
/// the grid: the letters of the five spell words plus the wildcard.
pub const RESERVED_WRITE_LETTERS: [char; 8] = ['L', 'O', 'K', 'T', 'A', 'B', 'E', 'X'];

/// Walked-cell cap per trail. Wildcard bends can revisit cells, so without a
/// cap a cycle of wildcards would walk forever; this bounds the walk, it does
/// not detect cycles.
pub const MAX_TRAIL_CELLS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Spell {
    Lok,
    Tlak,
    Ta,
    Be,
    Lolo,
}

impl Spell {
    pub const ALL: [Spell; 5] = [Spell::Lok, Spell::Tlak, Spell::Ta, Spell::Be, Spell::Lolo];

    #[inline]
    pub fn word(self) -> &'static str {
        match self {
            Spell::Lok => "LOK",
            Spell::Tlak => "TLAK",
            Spell::Ta => "TA",
            Spell::Be => "BE",
            Spell::Lolo => "LOLO",
        }
    }

    /// Exact-match lookup of a fully spelled word.
    pub fn from_word(word: &str) -> Option<Spell> {
        Spell::ALL.iter().copied().find(|s| s.word() == word)
    }
}

impl std::fmt::Display for Spell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.word())
    }
}

/// Letters a trail may start from. Every spell word begins with one of these.
#[inline]
pub fn is_start_letter(symbol: char) -> bool {
    matches!(symbol, 'L' | 'T' | 'B')
}

/// True if `spelled` is a proper prefix of at least one spell word, i.e. the
/// walk may still grow into a legal move.
pub fn is_proper_prefix(spelled: &str) -> bool {
    Spell::ALL
        .iter()
        .any(|s| s.word().len() > spelled.len() && s.word().starts_with(spelled))
}
