//! Scoped trial moves.

use std::ops::{Deref, DerefMut};

use super::TrialMoves;
use crate::board::{Color, Point};

/// A hypothetical move that is taken back when the guard drops.
///
/// Guards nest by reborrowing: `Trial::play(&mut *outer, ..)`. Inner guards
/// always drop first, so the undo order is the reverse of the play order on
/// every exit path.
pub struct Trial<'a, O: TrialMoves + ?Sized> {
    oracle: &'a mut O,
}

impl<'a, O: TrialMoves + ?Sized> Trial<'a, O> {
    /// Plays `mv` for `color`. Returns `None` when the move is illegal, in
    /// which case nothing needs undoing.
    pub fn play(oracle: &'a mut O, mv: Point, color: Color) -> Option<Self> {
        if oracle.try_move(mv, color) {
            Some(Trial { oracle })
        } else {
            None
        }
    }
}

impl<O: TrialMoves + ?Sized> Deref for Trial<'_, O> {
    type Target = O;

    fn deref(&self) -> &O {
        self.oracle
    }
}

impl<O: TrialMoves + ?Sized> DerefMut for Trial<'_, O> {
    fn deref_mut(&mut self) -> &mut O {
        self.oracle
    }
}

impl<O: TrialMoves + ?Sized> Drop for Trial<'_, O> {
    fn drop(&mut self) {
        self.oracle.undo_move();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Stack {
        moves: Vec<Point>,
        undone: Vec<Point>,
    }

    impl TrialMoves for Stack {
        fn try_move(&mut self, mv: Point, _color: Color) -> bool {
            if mv.row == 0 {
                return false;
            }
            self.moves.push(mv);
            true
        }

        fn undo_move(&mut self) {
            if let Some(mv) = self.moves.pop() {
                self.undone.push(mv);
            }
        }
    }

    fn nested(stack: &mut Stack) -> Option<usize> {
        let mut outer = Trial::play(stack, Point::new(1, 1), Color::Black)?;
        let mut inner = Trial::play(&mut *outer, Point::new(2, 2), Color::White)?;
        let depth = inner.moves.len();
        let _never = Trial::play(&mut *inner, Point::new(0, 0), Color::Black)?;
        Some(depth)
    }

    #[test]
    fn guards_undo_in_reverse_order_on_early_return() {
        let mut stack = Stack::default();
        assert_eq!(nested(&mut stack), None);
        assert!(stack.moves.is_empty());
        assert_eq!(stack.undone, vec![Point::new(2, 2), Point::new(1, 1)]);
    }

    #[test]
    fn illegal_move_needs_no_undo() {
        let mut stack = Stack::default();
        assert!(Trial::play(&mut stack, Point::new(0, 3), Color::Black).is_none());
        assert!(stack.undone.is_empty());
    }
}
