use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 9;

/// Order in which the targets have to be found
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
pub enum Mode {
    #[serde(rename = "numbers")]
    #[value(name = "numbers")]
    #[strum(to_string = "numbers ascending")]
    Ascending,
    #[serde(rename = "numbers-desc")]
    #[value(name = "numbers-desc")]
    #[strum(to_string = "numbers descending")]
    Descending,
    #[serde(rename = "letters")]
    #[value(name = "letters")]
    #[strum(to_string = "letters")]
    Letters,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Ascending, Mode::Descending, Mode::Letters];

    /// Stable identifier used in storage keys
    pub fn key(&self) -> &'static str {
        match self {
            Mode::Ascending => "numbers",
            Mode::Descending => "numbers-desc",
            Mode::Letters => "letters",
        }
    }

    /// One-line instruction for a `size`×`size` table
    pub fn describe(&self, size: usize) -> String {
        let total = size * size;
        match self {
            Mode::Ascending => format!("find 1 → {total}"),
            Mode::Descending => format!("find {total} → 1"),
            Mode::Letters if total > 26 => "find A → Z, then again from A".to_string(),
            Mode::Letters => format!("find A → {}", char::from(b'A' + total as u8 - 1)),
        }
    }

    pub fn next(&self) -> Mode {
        match self {
            Mode::Ascending => Mode::Descending,
            Mode::Descending => Mode::Letters,
            Mode::Letters => Mode::Ascending,
        }
    }
}

pub fn clamp_size(size: usize) -> usize {
    size.clamp(MIN_SIZE, MAX_SIZE)
}

/// Ordered targets for a `size`×`size` table.
///
/// Letters cycle through A–Z, so tables above 26 cells contain repeats.
pub fn generate_sequence(size: usize, mode: Mode) -> Vec<String> {
    let total = size * size;
    match mode {
        Mode::Ascending => (1..=total).map(|n| n.to_string()).collect(),
        Mode::Descending => (1..=total).rev().map(|n| n.to_string()).collect(),
        Mode::Letters => (b'A'..=b'Z')
            .cycle()
            .take(total)
            .map(|b| char::from(b).to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequence_length_for_every_size_and_mode() {
        for size in MIN_SIZE..=MAX_SIZE {
            for mode in Mode::ALL {
                assert_eq!(generate_sequence(size, mode).len(), size * size);
            }
        }
    }

    #[test]
    fn test_numeric_modes_contain_each_number_once() {
        for size in MIN_SIZE..=MAX_SIZE {
            for mode in [Mode::Ascending, Mode::Descending] {
                let seq = generate_sequence(size, mode);
                let numbers: HashSet<usize> = seq.iter().map(|s| s.parse().unwrap()).collect();
                let expected: HashSet<usize> = (1..=size * size).collect();
                assert_eq!(numbers, expected);
            }
        }
    }

    #[test]
    fn test_ascending_three() {
        let seq = generate_sequence(3, Mode::Ascending);
        assert_eq!(seq, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[test]
    fn test_descending_is_reverse_of_ascending() {
        let mut asc = generate_sequence(4, Mode::Ascending);
        asc.reverse();
        assert_eq!(generate_sequence(4, Mode::Descending), asc);
        assert_eq!(generate_sequence(4, Mode::Descending)[0], "16");
    }

    #[test]
    fn test_letters_start_at_a() {
        let seq = generate_sequence(3, Mode::Letters);
        assert_eq!(seq, vec!["A", "B", "C", "D", "E", "F", "G", "H", "I"]);
    }

    #[test]
    fn test_letters_wrap_past_z() {
        let seq = generate_sequence(6, Mode::Letters);
        assert_eq!(seq[25], "Z");
        assert_eq!(seq[26], "A");
        assert_eq!(seq[35], "J");
    }

    #[test]
    fn test_mode_keys() {
        assert_eq!(Mode::Ascending.key(), "numbers");
        assert_eq!(Mode::Descending.key(), "numbers-desc");
        assert_eq!(Mode::Letters.key(), "letters");
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Ascending.to_string(), "numbers ascending");
        assert_eq!(Mode::Descending.to_string(), "numbers descending");
        assert_eq!(Mode::Letters.to_string(), "letters");
    }

    #[test]
    fn test_mode_next_cycles() {
        let mut mode = Mode::Ascending;
        for _ in 0..3 {
            mode = mode.next();
        }
        assert_eq!(mode, Mode::Ascending);
    }

    #[test]
    fn test_clamp_size() {
        assert_eq!(clamp_size(0), 3);
        assert_eq!(clamp_size(5), 5);
        assert_eq!(clamp_size(12), 9);
    }

    #[test]
    fn test_describe_names_first_and_last_target() {
        assert_eq!(Mode::Ascending.describe(3), "find 1 → 9");
        assert_eq!(Mode::Descending.describe(9), "find 81 → 1");
        assert_eq!(Mode::Letters.describe(5), "find A → Y");
        assert_eq!(Mode::Letters.describe(6), "find A → Z, then again from A");
    }
}
