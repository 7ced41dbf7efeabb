//! Acceptable indentation columns.

use std::fmt;

/// Non-empty set of columns a construct may start at
///
/// Kept as a small sorted vector without duplicates. Offsets that would take
/// a column below zero clamp to zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndentLevel {
    levels: Vec<usize>,
}

impl IndentLevel {
    /// Level accepting exactly `column`
    pub fn new(column: usize) -> Self {
        Self {
            levels: vec![column],
        }
    }

    /// Cross product of this level's columns with `offsets`
    pub fn with_offsets(&self, offsets: &[isize]) -> Self {
        let mut levels: Vec<usize> = self
            .levels
            .iter()
            .flat_map(|&base| offsets.iter().map(move |&offset| shift(base, offset)))
            .collect();
        if levels.is_empty() {
            return self.clone();
        }
        levels.sort_unstable();
        levels.dedup();
        Self { levels }
    }

    /// Shorthand for a single non-negative offset
    pub fn offset(&self, offset: usize) -> Self {
        self.with_offsets(&[offset as isize])
    }

    pub fn is_acceptable(&self, column: usize) -> bool {
        self.levels.binary_search(&column).is_ok()
    }

    /// True when `column` is shallower than every acceptable column
    pub fn is_greater_than(&self, column: usize) -> bool {
        column < self.first_level()
    }

    pub fn is_multi_level(&self) -> bool {
        self.levels.len() > 1
    }

    pub fn first_level(&self) -> usize {
        self.levels[0]
    }

    pub fn last_level(&self) -> usize {
        self.levels[self.levels.len() - 1]
    }

    /// Union with raw columns
    pub fn add_columns(&self, columns: &[usize]) -> Self {
        let mut levels = self.levels.clone();
        levels.extend_from_slice(columns);
        levels.sort_unstable();
        levels.dedup();
        Self { levels }
    }

    /// Union with another level
    pub fn add_acceptable(&self, other: &IndentLevel) -> Self {
        self.add_columns(&other.levels)
    }

    pub fn levels(&self) -> &[usize] {
        &self.levels
    }
}

fn shift(base: usize, offset: isize) -> usize {
    if offset < 0 {
        base.saturating_sub(offset.unsigned_abs())
    } else {
        base + offset as usize
    }
}

impl fmt::Display for IndentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in self.levels.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", level)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product() {
        let base = IndentLevel::new(4).add_columns(&[8]);
        let level = base.with_offsets(&[0, 4]);
        assert_eq!(level.levels(), &[4, 8, 12]);
        assert!(level.is_multi_level());
        assert_eq!(level.first_level(), 4);
        assert_eq!(level.last_level(), 12);
    }

    #[test]
    fn test_negative_offset_clamps() {
        let level = IndentLevel::new(2).with_offsets(&[-4, 0]);
        assert_eq!(level.levels(), &[0, 2]);
    }

    #[test]
    fn test_greater_than_means_shallower() {
        let level = IndentLevel::new(8).add_columns(&[12]);
        assert!(level.is_greater_than(4));
        assert!(!level.is_greater_than(8));
        assert!(!level.is_greater_than(10));
        assert!(!level.is_acceptable(10));
    }

    #[test]
    fn test_display() {
        assert_eq!(IndentLevel::new(8).to_string(), "8");
        let multi = IndentLevel::new(12).add_columns(&[4, 8]);
        assert_eq!(multi.to_string(), "4, 8, 12");
        assert!(!IndentLevel::new(3).is_multi_level());
    }

    #[test]
    fn test_union() {
        let a = IndentLevel::new(0).offset(4);
        let b = IndentLevel::new(8);
        assert_eq!(a.add_acceptable(&b).levels(), &[4, 8]);
        assert_eq!(a.add_acceptable(&a).levels(), &[4]);
    }
}
