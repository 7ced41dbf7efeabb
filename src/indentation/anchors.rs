//! Leftmost node per physical line.

use std::collections::BTreeMap;

use crate::parser::NodeId;

/// Node recorded for one line together with its expanded column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub node: NodeId,
    pub column: usize,
}

/// Ordered map from line to the node that leads it
#[derive(Debug, Clone, Default)]
pub struct LineAnchorSet {
    lines: BTreeMap<usize, Anchor>,
}

impl LineAnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite whatever is recorded for `line`
    pub fn insert(&mut self, line: usize, node: NodeId, column: usize) {
        self.lines.insert(line, Anchor { node, column });
    }

    /// Record the node if the line is empty or it sits strictly left of the
    /// current anchor
    pub fn insert_if_left(&mut self, line: usize, node: NodeId, column: usize) {
        match self.lines.get(&line) {
            Some(anchor) if anchor.column <= column => {}
            _ => self.insert(line, node, column),
        }
    }

    /// Record the node if the line is empty or it sits at or left of the
    /// current anchor, so later nodes win ties
    pub fn insert_if_not_right(&mut self, line: usize, node: NodeId, column: usize) {
        match self.lines.get(&line) {
            Some(anchor) if anchor.column < column => {}
            _ => self.insert(line, node, column),
        }
    }

    pub fn get(&self, line: usize) -> Option<Anchor> {
        self.lines.get(&line).copied()
    }

    pub fn remove(&mut self, line: usize) -> Option<Anchor> {
        self.lines.remove(&line)
    }

    pub fn first(&self) -> Option<(usize, Anchor)> {
        self.lines.first_key_value().map(|(&line, &anchor)| (line, anchor))
    }

    pub fn last_line(&self) -> Option<usize> {
        self.lines.last_key_value().map(|(&line, _)| line)
    }

    /// First recorded line strictly after `line`
    pub fn line_after(&self, line: usize) -> Option<usize> {
        self.lines
            .range(line + 1..)
            .next()
            .map(|(&line, _)| line)
    }

    /// Recorded lines within `from..=to`
    pub fn lines_between(&self, from: usize, to: usize) -> Vec<usize> {
        if from > to {
            return Vec::new();
        }
        self.lines.range(from..=to).map(|(&line, _)| line).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Anchor)> + '_ {
        self.lines.iter().map(|(&line, &anchor)| (line, anchor))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
