//! Board primitives shared by every stage of move review.

pub mod marks;
pub mod point;
pub mod status;

pub use marks::{PointSet, StoneMark, StoneMarks};
pub use point::{BoardSize, Point, PointError, MAX_BOARD};
pub use status::{Color, Outcome, Safety, Status};
