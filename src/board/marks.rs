//! Per-point sets and the capture/save marking handed to the influence
//! estimator.

use super::point::{BoardSize, Point};

/// Membership set over the points of one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSet {
    size: BoardSize,
    members: Vec<bool>,
}

impl PointSet {
    pub fn new(size: BoardSize) -> Self {
        PointSet {
            size,
            members: vec![false; size.area()],
        }
    }

    pub fn insert(&mut self, p: Point) {
        if self.size.contains(p) {
            self.members[self.size.index(p)] = true;
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        self.size.contains(p) && self.members[self.size.index(p)]
    }

    pub fn len(&self) -> usize {
        self.members.iter().filter(|&&m| m).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.members.iter().any(|&m| m)
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.size.points().filter(move |&p| self.contains(p))
    }
}

/// Hypothetical fate of a stone after the evaluated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoneMark {
    Captured,
    Saved,
}

/// Capture/save marking over the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoneMarks {
    size: BoardSize,
    marks: Vec<Option<StoneMark>>,
}

impl StoneMarks {
    pub fn new(size: BoardSize) -> Self {
        StoneMarks {
            size,
            marks: vec![None; size.area()],
        }
    }

    pub fn set(&mut self, p: Point, mark: StoneMark) {
        if self.size.contains(p) {
            self.marks[self.size.index(p)] = Some(mark);
        }
    }

    pub fn get(&self, p: Point) -> Option<StoneMark> {
        if self.size.contains(p) {
            self.marks[self.size.index(p)]
        } else {
            None
        }
    }

    /// Marked points in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, StoneMark)> + '_ {
        self.size
            .points()
            .filter_map(move |p| self.get(p).map(|m| (p, m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_set_ignores_off_board() {
        let size = BoardSize::new(5).unwrap();
        let mut set = PointSet::new(size);
        assert!(set.is_empty());
        set.insert(Point::new(1, 1));
        set.insert(Point::new(9, 9));
        assert_eq!(set.len(), 1);
        assert!(set.contains(Point::new(1, 1)));
        assert!(!set.contains(Point::new(9, 9)));
    }

    #[test]
    fn later_marks_overwrite_earlier_ones() {
        let size = BoardSize::new(5).unwrap();
        let mut marks = StoneMarks::new(size);
        marks.set(Point::new(2, 2), StoneMark::Captured);
        marks.set(Point::new(2, 2), StoneMark::Saved);
        assert_eq!(marks.get(Point::new(2, 2)), Some(StoneMark::Saved));
        assert_eq!(marks.iter().count(), 1);
    }
}
