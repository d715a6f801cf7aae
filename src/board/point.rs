//! Board coordinates.
//!
//! Points use `(row, col)` with row 0 on the bottom edge. The text form is
//! the usual vertex notation (`A1` .. `Z25`, skipping the letter `I`).
//! The derived ordering is row-major, which is also the canonical scan order
//! used by every pass over the board.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported board edge.
pub const MAX_BOARD: u8 = 25;

/// Column letters in vertex notation.
const COLUMNS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Errors produced when parsing points or building board sizes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointError {
    #[error("empty vertex")]
    Empty,

    #[error("invalid column '{0}'")]
    InvalidColumn(char),

    #[error("invalid row '{0}'")]
    InvalidRow(String),

    #[error("board size {0} is not between 1 and 25")]
    InvalidSize(u8),
}

/// A single intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Point {
    pub row: u8,
    pub col: u8,
}

impl Point {
    pub const fn new(row: u8, col: u8) -> Self {
        Point { row, col }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = COLUMNS.get(self.col as usize).copied().unwrap_or(b'?') as char;
        write!(f, "{}{}", letter, self.row as u32 + 1)
    }
}

impl FromStr for Point {
    type Err = PointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(PointError::Empty)?;
        let upper = letter.to_ascii_uppercase();
        let col = COLUMNS
            .iter()
            .position(|&c| c as char == upper)
            .ok_or(PointError::InvalidColumn(letter))?;
        let digits = chars.as_str();
        let row: u8 = digits
            .parse()
            .map_err(|_| PointError::InvalidRow(digits.to_string()))?;
        if row == 0 || row > MAX_BOARD {
            return Err(PointError::InvalidRow(digits.to_string()));
        }
        Ok(Point::new(row - 1, col as u8))
    }
}

impl TryFrom<String> for Point {
    type Error = PointError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Point> for String {
    fn from(p: Point) -> String {
        p.to_string()
    }
}

/// Edge length of a square board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSize(u8);

impl BoardSize {
    pub fn new(n: u8) -> Result<Self, PointError> {
        if n == 0 || n > MAX_BOARD {
            return Err(PointError::InvalidSize(n));
        }
        Ok(BoardSize(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of intersections.
    pub fn area(self) -> usize {
        self.0 as usize * self.0 as usize
    }

    pub fn contains(self, p: Point) -> bool {
        p.row < self.0 && p.col < self.0
    }

    /// Dense index of an on-board point.
    pub fn index(self, p: Point) -> usize {
        p.row as usize * self.0 as usize + p.col as usize
    }

    /// Inverse of [`BoardSize::index`].
    pub fn point(self, index: usize) -> Point {
        let n = self.0 as usize;
        Point::new((index / n) as u8, (index % n) as u8)
    }

    /// All points in row-major order.
    pub fn points(self) -> impl Iterator<Item = Point> {
        let n = self.0;
        (0..n).flat_map(move |row| (0..n).map(move |col| Point::new(row, col)))
    }

    /// All points as read off a diagram: top row first, each row left to
    /// right. Move selection breaks exact ties in this order.
    pub fn points_from_top(self) -> impl Iterator<Item = Point> {
        let n = self.0;
        (0..n)
            .rev()
            .flat_map(move |row| (0..n).map(move |col| Point::new(row, col)))
    }

    /// Orthogonal neighbours that lie on the board.
    pub fn neighbors(self, p: Point) -> impl Iterator<Item = Point> {
        let n = self.0 as i16;
        let (r, c) = (p.row as i16, p.col as i16);
        [(r - 1, c), (r, c - 1), (r + 1, c), (r, c + 1)]
            .into_iter()
            .filter(move |&(r, c)| r >= 0 && c >= 0 && r < n && c < n)
            .map(|(r, c)| Point::new(r as u8, c as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_notation_skips_i() {
        assert_eq!(Point::new(3, 3).to_string(), "D4");
        assert_eq!(Point::new(0, 8).to_string(), "J1");
        assert_eq!("j1".parse::<Point>(), Ok(Point::new(0, 8)));
        assert_eq!("T19".parse::<Point>(), Ok(Point::new(18, 18)));
    }

    #[test]
    fn bad_vertices_are_rejected() {
        assert_eq!("".parse::<Point>(), Err(PointError::Empty));
        assert_eq!("I5".parse::<Point>(), Err(PointError::InvalidColumn('I')));
        assert!(matches!("C0".parse::<Point>(), Err(PointError::InvalidRow(_))));
        assert!(matches!("Cx".parse::<Point>(), Err(PointError::InvalidRow(_))));
    }

    #[test]
    fn points_follow_row_major_order() {
        let size = BoardSize::new(3).unwrap();
        let points: Vec<Point> = size.points().collect();
        assert_eq!(points.len(), 9);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
        for (i, p) in points.iter().enumerate() {
            assert_eq!(size.index(*p), i);
            assert_eq!(size.point(i), *p);
        }
    }

    #[test]
    fn diagram_order_starts_at_top_left() {
        let size = BoardSize::new(3).unwrap();
        let points: Vec<String> = size.points_from_top().map(|p| p.to_string()).collect();
        assert_eq!(points, ["A3", "B3", "C3", "A2", "B2", "C2", "A1", "B1", "C1"]);
    }

    #[test]
    fn corner_has_two_neighbors() {
        let size = BoardSize::new(9).unwrap();
        assert_eq!(size.neighbors(Point::new(0, 0)).count(), 2);
        assert_eq!(size.neighbors(Point::new(4, 0)).count(), 3);
        assert_eq!(size.neighbors(Point::new(4, 4)).count(), 4);
    }

    #[test]
    fn size_is_bounded() {
        assert!(BoardSize::new(0).is_err());
        assert!(BoardSize::new(26).is_err());
        assert_eq!(BoardSize::new(19).unwrap().area(), 361);
    }

    #[test]
    fn serde_uses_vertex_strings() {
        let p: Point = serde_json::from_str("\"C3\"").unwrap();
        assert_eq!(p, Point::new(2, 2));
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"C3\"");
    }
}
