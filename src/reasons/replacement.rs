//! Point redistribution.
//!
//! A rule `from -> to` sends the value computed at `from` to `to`. Rules
//! are kept path compressed: every entry names its final destination, so
//! redistribution never follows more than one hop.

use super::error::ReasonError;
use crate::board::{BoardSize, Point};

#[derive(Debug, Clone)]
pub struct ReplacementMap {
    size: BoardSize,
    targets: Vec<Option<Point>>,
}

impl ReplacementMap {
    pub fn new(size: BoardSize) -> Self {
        ReplacementMap {
            size,
            targets: vec![None; size.area()],
        }
    }

    pub fn clear(&mut self) {
        self.targets.iter_mut().for_each(|t| *t = None);
    }

    /// Final destination for `from`, if it is redirected.
    pub fn get(&self, from: Point) -> Option<Point> {
        if self.size.contains(from) {
            self.targets[self.size.index(from)]
        } else {
            None
        }
    }

    /// Adds the rule `from -> to`.
    ///
    /// A rule compatible with an existing one for `from` is accepted and
    /// changes nothing. Self-loops and rules closing a cycle are rejected.
    pub fn add(&mut self, from: Point, to: Point) -> Result<(), ReasonError> {
        for p in [from, to] {
            if !self.size.contains(p) {
                return Err(ReasonError::OffBoard(p));
            }
        }
        if from == to {
            return Err(ReasonError::CyclicReplacement { from, to });
        }

        let onward = self.get(to);
        if let Some(existing) = self.get(from) {
            if existing == to || onward == Some(existing) || self.get(existing) == Some(to) {
                return Ok(());
            }
            return Err(ReasonError::ConflictingReplacement { from, to, existing });
        }

        if onward == Some(from) {
            return Err(ReasonError::CyclicReplacement { from, to });
        }

        let destination = onward.unwrap_or(to);
        let index = self.size.index(from);
        self.targets[index] = Some(destination);
        for target in self.targets.iter_mut() {
            if *target == Some(from) {
                *target = Some(destination);
            }
        }
        log::trace!("move at {} is replaced by {}", from, destination);
        Ok(())
    }

    /// All rules in row-major order of their source.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.size
            .points()
            .filter_map(move |p| self.get(p).map(|t| (p, t)))
    }
}
