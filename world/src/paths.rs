//! Pure attack-path and collision computation over a board snapshot.

use std::collections::BTreeMap;

use nqueens_core::{AttackMarker, Direction, MarkerGrid, PathReport, QueenId, SquareCoord};

use crate::{board::Board, Queen};

/// Row and column deltas for each compass direction in canonical scan order.
const DIRECTION_STEPS: [(Direction, i64, i64); 8] = [
    (Direction::North, -1, 0),
    (Direction::NorthEast, -1, 1),
    (Direction::East, 0, 1),
    (Direction::SouthEast, 1, 1),
    (Direction::South, 1, 0),
    (Direction::SouthWest, 1, -1),
    (Direction::West, 0, -1),
    (Direction::NorthWest, -1, -1),
];

/// Computes attack coverage and conflicts for every placed queen.
///
/// For each placed queen and each direction the scan walks outward until the
/// board edge or an occupied square; the scanned span (blocker included, the
/// queen's own square excluded) receives one marker per crossing ray, and a
/// blocked ray additionally records the direction against the scanning
/// queen's own square. Shelf queens contribute nothing. The computation reads
/// only its inputs, so repeated runs over one snapshot are identical.
pub(crate) fn compute(
    board: &Board,
    queens: &[Queen],
    dragged: Option<QueenId>,
    revision: u64,
) -> PathReport {
    let mut markers = MarkerGrid::new(board.size());
    let mut collisions: BTreeMap<SquareCoord, Vec<Direction>> = BTreeMap::new();

    for queen in queens {
        let Some(origin) = queen.square else {
            continue;
        };

        for (direction, row_step, col_step) in DIRECTION_STEPS {
            scan_ray(
                board,
                &mut markers,
                &mut collisions,
                queen.id,
                origin,
                direction,
                row_step,
                col_step,
            );
        }
    }

    let available_queens = queens
        .iter()
        .filter(|queen| queen.square.is_none() && Some(queen.id) != dragged)
        .count() as u32;

    PathReport {
        revision,
        markers,
        collisions,
        available_queens,
    }
}

/// Walks one ray to the edge or the first blocker, then stamps the span.
#[allow(clippy::too_many_arguments)]
fn scan_ray(
    board: &Board,
    markers: &mut MarkerGrid,
    collisions: &mut BTreeMap<SquareCoord, Vec<Direction>>,
    queen: QueenId,
    origin: SquareCoord,
    direction: Direction,
    row_step: i64,
    col_step: i64,
) {
    let edge = i64::from(board.size());
    let mut row = i64::from(origin.row()) + row_step;
    let mut col = i64::from(origin.col()) + col_step;

    let mut span: Vec<SquareCoord> = Vec::new();
    let mut collision = false;

    while (0..edge).contains(&row) && (0..edge).contains(&col) {
        let coord = SquareCoord::new(row as u32, col as u32);
        span.push(coord);
        if board.has_occupant(coord) {
            collision = true;
            break;
        }
        row += row_step;
        col += col_step;
    }

    for coord in span {
        markers.push(
            coord,
            AttackMarker {
                queen,
                direction,
                collision,
            },
        );
    }

    if collision {
        collisions.entry(origin).or_default().push(direction);
    }
}
