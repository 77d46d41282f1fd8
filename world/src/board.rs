//! Authoritative board grid storing occupants and screen geometry.

use nqueens_core::{BoardSize, QueenId, ScreenPoint, ScreenRect, ScreenSize, SquareCoord};

/// State stored for a single board square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SquareState {
    /// Board coordinate identifying the square.
    pub(crate) coord: SquareCoord,
    /// Whether the square renders with the light checkerboard shade.
    pub(crate) light: bool,
    /// Queen currently bound to the square, if any.
    pub(crate) occupant: Option<QueenId>,
    /// Window-space rectangle the square was last laid out at.
    pub(crate) rect: ScreenRect,
}

/// Dense N×N grid of squares owned by the session.
///
/// Lookups are tolerant: out-of-range coordinates answer `None` or act as
/// no-ops because gestures routinely report invalid cells mid-frame.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    size: u32,
    squares: Vec<SquareState>,
}

impl Board {
    /// Builds a fresh grid with checkerboard parity and empty squares.
    pub(crate) fn new(size: BoardSize) -> Self {
        let edge = size.get();
        let mut squares = Vec::with_capacity(size.square_count());
        for row in 0..edge {
            for col in 0..edge {
                squares.push(SquareState {
                    coord: SquareCoord::new(row, col),
                    light: is_light(row, col),
                    occupant: None,
                    rect: ScreenRect::default(),
                });
            }
        }
        Self {
            size: edge,
            squares,
        }
    }

    /// Placeholder grid used while no board has been sized.
    pub(crate) fn empty() -> Self {
        Self {
            size: 0,
            squares: Vec::new(),
        }
    }

    /// Edge length of the grid in squares.
    pub(crate) fn size(&self) -> u32 {
        self.size
    }

    /// Square stored at the coordinate, or `None` when out of range.
    pub(crate) fn square(&self, coord: SquareCoord) -> Option<&SquareState> {
        self.index(coord).and_then(|index| self.squares.get(index))
    }

    /// Queen bound to the coordinate, if the square exists and is occupied.
    pub(crate) fn occupant(&self, coord: SquareCoord) -> Option<QueenId> {
        self.square(coord).and_then(|square| square.occupant)
    }

    /// Whether the coordinate names an occupied square.
    pub(crate) fn has_occupant(&self, coord: SquareCoord) -> bool {
        self.occupant(coord).is_some()
    }

    /// Replaces the occupant of the square; out-of-range coordinates are a no-op.
    pub(crate) fn set_occupant(&mut self, coord: SquareCoord, occupant: Option<QueenId>) {
        if let Some(index) = self.index(coord) {
            if let Some(square) = self.squares.get_mut(index) {
                square.occupant = occupant;
            }
        }
    }

    /// Updates the window-space rectangle of the square after a layout pass.
    pub(crate) fn set_geometry(&mut self, coord: SquareCoord, origin: ScreenPoint, size: ScreenSize) {
        if let Some(index) = self.index(coord) {
            if let Some(square) = self.squares.get_mut(index) {
                square.rect = ScreenRect::new(origin, size);
            }
        }
    }

    /// Square whose rectangle strictly contains the point, scanning row-major.
    ///
    /// Rectangles are maintained by geometry-sync commands and assumed
    /// non-overlapping, so the first match is the only match.
    pub(crate) fn square_under_point(&self, point: ScreenPoint) -> Option<SquareCoord> {
        self.squares
            .iter()
            .find(|square| square.rect.contains(point))
            .map(|square| square.coord)
    }

    /// Iterates every square in row-major order.
    pub(crate) fn squares(&self) -> impl Iterator<Item = &SquareState> {
        self.squares.iter()
    }

    fn index(&self, coord: SquareCoord) -> Option<usize> {
        if coord.row() < self.size && coord.col() < self.size {
            let row = usize::try_from(coord.row()).ok()?;
            let col = usize::try_from(coord.col()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + col)
        } else {
            None
        }
    }
}

fn is_light(row: u32, col: u32) -> bool {
    (row + col) % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(edge: i64) -> Board {
        Board::new(BoardSize::new(edge).expect("positive size"))
    }

    #[test]
    fn parity_alternates_from_a_light_corner() {
        let board = sized(4);

        let corner = board.square(SquareCoord::new(0, 0)).expect("square");
        assert!(corner.light);
        let neighbour = board.square(SquareCoord::new(0, 1)).expect("square");
        assert!(!neighbour.light);
        let diagonal = board.square(SquareCoord::new(1, 1)).expect("square");
        assert!(diagonal.light);
    }

    #[test]
    fn lookups_outside_the_grid_answer_none() {
        let board = sized(4);

        assert!(board.square(SquareCoord::new(4, 0)).is_none());
        assert!(board.square(SquareCoord::new(0, 4)).is_none());
        assert!(!board.has_occupant(SquareCoord::new(17, 17)));
    }

    #[test]
    fn occupant_updates_outside_the_grid_are_ignored() {
        let mut board = sized(4);

        board.set_occupant(SquareCoord::new(9, 9), Some(QueenId::new(0)));
        assert!(board.squares().all(|square| square.occupant.is_none()));

        board.set_occupant(SquareCoord::new(2, 2), Some(QueenId::new(1)));
        assert_eq!(board.occupant(SquareCoord::new(2, 2)), Some(QueenId::new(1)));

        board.set_occupant(SquareCoord::new(2, 2), None);
        assert!(!board.has_occupant(SquareCoord::new(2, 2)));
    }

    #[test]
    fn hit_test_resolves_the_square_containing_the_point() {
        let mut board = sized(2);
        for row in 0..2 {
            for col in 0..2 {
                board.set_geometry(
                    SquareCoord::new(row, col),
                    ScreenPoint::new(col as f32 * 50.0, row as f32 * 50.0),
                    ScreenSize::new(50.0, 50.0),
                );
            }
        }

        assert_eq!(
            board.square_under_point(ScreenPoint::new(75.0, 25.0)),
            Some(SquareCoord::new(0, 1))
        );
        assert_eq!(
            board.square_under_point(ScreenPoint::new(25.0, 75.0)),
            Some(SquareCoord::new(1, 0))
        );
        assert_eq!(board.square_under_point(ScreenPoint::new(150.0, 150.0)), None);
    }

    #[test]
    fn hit_test_misses_before_geometry_sync() {
        let board = sized(4);
        assert_eq!(board.square_under_point(ScreenPoint::new(1.0, 1.0)), None);
    }

    #[test]
    fn empty_board_has_no_squares() {
        let board = Board::empty();
        assert_eq!(board.size(), 0);
        assert!(board.square(SquareCoord::new(0, 0)).is_none());
    }
}
