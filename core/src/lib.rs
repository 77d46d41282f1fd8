#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the N-Queens engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to N-Queens.";

/// Lifecycle phase of a puzzle session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No board has been sized yet.
    Idle,
    /// Board and queens are freshly sized and await the first interaction.
    Setup,
    /// The timer is running and placements are accepted.
    Playing,
    /// The puzzle is solved; terminal until a restart or a resize.
    Complete,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the board and the queen shelf for the provided size.
    ConfigureBoard {
        /// Validated edge length of the new board.
        size: BoardSize,
    },
    /// Reports the pixel dimensions of the render surface hosting the board.
    LayoutReady {
        /// Width of the surface in pixels.
        width: f32,
        /// Height of the surface in pixels.
        height: f32,
    },
    /// Updates the screen rectangle occupied by a single board square.
    SyncSquareGeometry {
        /// Board coordinate of the square being positioned.
        square: SquareCoord,
        /// Top-left corner of the square in window space.
        origin: ScreenPoint,
        /// Pixel dimensions of the square.
        size: ScreenSize,
    },
    /// Updates the window-space origin of the queen shelf.
    SyncShelfOrigin {
        /// Top-left corner of the shelf in window space.
        origin: ScreenPoint,
    },
    /// Requests that the next shelf queen be bound to the provided square.
    PlaceQueen {
        /// Destination square for the placement.
        square: SquareCoord,
    },
    /// Requests that a placed queen be unbound and returned to the shelf.
    ReturnQueen {
        /// Identifier of the queen to return.
        queen: QueenId,
    },
    /// Marks a queen as grabbed by the pointer.
    BeginDrag {
        /// Identifier of the queen being dragged.
        queen: QueenId,
    },
    /// Moves a dragged queen by a pixel delta and re-resolves its hover square.
    DragBy {
        /// Identifier of the queen being dragged.
        queen: QueenId,
        /// Pointer movement since the previous drag update.
        delta: ScreenPoint,
    },
    /// Releases a dragged queen onto its hover square or back to the shelf.
    EndDrag {
        /// Identifier of the queen being released.
        queen: QueenId,
    },
    /// Returns every placed queen to the shelf and restarts the timer.
    Restart,
    /// Toggles the move-path overlay preference.
    SetShowMoves {
        /// Whether attack paths should be surfaced to renderers.
        show: bool,
    },
    /// Seeds the session with best times restored from the preference store.
    RestoreBestTimes {
        /// Persisted best completion times keyed by board size.
        times: BestTimes,
    },
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Applies a finished path recomputation back onto the session.
    PublishPathReport {
        /// Report produced by the path engine over a board snapshot.
        report: PathReport,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the board was rebuilt at a new size.
    BoardConfigured {
        /// Edge length of the rebuilt board.
        size: BoardSize,
    },
    /// Announces that the session entered a new lifecycle phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: Phase,
    },
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
    },
    /// Signals that queen placements changed and paths must be recomputed.
    BoardChanged {
        /// Revision stamped on the board after the mutation.
        revision: u64,
    },
    /// Confirms that a queen was bound to a board square.
    QueenPlaced {
        /// Identifier of the placed queen.
        queen: QueenId,
        /// Square the queen now occupies.
        square: SquareCoord,
    },
    /// Confirms that a queen was unbound and returned to the shelf.
    QueenReturned {
        /// Identifier of the returned queen.
        queen: QueenId,
    },
    /// Confirms a change to the move-path overlay preference.
    ShowMovesChanged {
        /// Whether attack paths should be surfaced to renderers.
        show: bool,
    },
    /// Confirms that a path report matched the current board revision.
    PathReportApplied {
        /// Revision carried by the applied report.
        revision: u64,
    },
    /// Reports that a stale path report was dropped.
    PathReportDiscarded {
        /// Revision carried by the discarded report.
        revision: u64,
    },
    /// Announces that the puzzle was solved.
    PuzzleCompleted {
        /// Size of the solved board.
        size: BoardSize,
        /// Elapsed play time at the moment of completion.
        elapsed_millis: u64,
    },
    /// Reports that a completion improved the stored best time for its size.
    BestTimeRecorded {
        /// Size of the solved board.
        size: BoardSize,
        /// Newly recorded best completion time.
        millis: u64,
    },
}

/// Unique identifier assigned to a queen.
///
/// Identifiers are stable indices `0..N` allocated when the board is sized.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct QueenId(u32);

impl QueenId {
    /// Creates a new queen identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Validated edge length of an N-Queens board.
///
/// Construction is the single place size validation happens: a value that
/// exists is always positive, so downstream code never re-checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardSize(u32);

impl BoardSize {
    /// Validates the requested edge length.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSizeError`] when the requested size is not positive or
    /// does not fit the board's coordinate range.
    pub fn new(requested: i64) -> Result<Self, InvalidSizeError> {
        if requested <= 0 {
            return Err(InvalidSizeError { requested });
        }

        match u32::try_from(requested) {
            Ok(value) => Ok(Self(value)),
            Err(_) => Err(InvalidSizeError { requested }),
        }
    }

    /// Retrieves the validated edge length.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Number of squares contained in a board of this size.
    #[must_use]
    pub fn square_count(&self) -> usize {
        let edge = usize::try_from(self.0).unwrap_or(0);
        edge.saturating_mul(edge)
    }
}

/// Error raised when a board resize requests a non-positive edge length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("board size {requested} is not a positive edge length")]
pub struct InvalidSizeError {
    requested: i64,
}

impl InvalidSizeError {
    /// Edge length that failed validation.
    #[must_use]
    pub const fn requested(&self) -> i64 {
        self.requested
    }
}

/// Location of a single board square expressed as row and column indices.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SquareCoord {
    row: u32,
    col: u32,
}

impl SquareCoord {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the square.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the square.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.col
    }
}

/// Compass directions along which a queen projects attack rays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward decreasing rows and increasing columns.
    NorthEast,
    /// Toward increasing column indices.
    East,
    /// Toward increasing rows and columns.
    SouthEast,
    /// Toward increasing row indices.
    South,
    /// Toward increasing rows and decreasing columns.
    SouthWest,
    /// Toward decreasing column indices.
    West,
    /// Toward decreasing rows and columns.
    NorthWest,
}

impl Direction {
    /// All eight compass directions in canonical scan order.
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];
}

/// Position in window space measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
}

impl ScreenPoint {
    /// Origin of window space.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new window-space position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line pixel distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }
}

/// Pixel dimensions of a rendered element.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl ScreenSize {
    /// Creates a new pixel size descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned window-space rectangle occupied by a board square.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenRect {
    /// Top-left corner of the rectangle.
    pub origin: ScreenPoint,
    /// Pixel dimensions of the rectangle.
    pub size: ScreenSize,
}

impl ScreenRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(origin: ScreenPoint, size: ScreenSize) -> Self {
        Self { origin, size }
    }

    /// Reports whether the point lies strictly inside the rectangle.
    ///
    /// Both bounds are exclusive so that a degenerate rectangle never claims
    /// a point and adjacent squares never claim a shared edge.
    #[must_use]
    pub fn contains(&self, point: ScreenPoint) -> bool {
        self.origin.x < point.x
            && point.x < self.origin.x + self.size.width
            && self.origin.y < point.y
            && point.y < self.origin.y + self.size.height
    }
}

/// Directional annotation recorded on a square crossed by an attack ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackMarker {
    /// Queen whose ray crosses the square.
    pub queen: QueenId,
    /// Direction the ray was scanned in, relative to the queen.
    pub direction: Direction,
    /// Whether the scanned ray terminated on another queen.
    pub collision: bool,
}

/// Dense per-square accumulation of [`AttackMarker`] values.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MarkerGrid {
    size: u32,
    cells: Vec<Vec<AttackMarker>>,
}

impl MarkerGrid {
    /// Creates an empty marker grid covering a board with the provided edge.
    #[must_use]
    pub fn new(edge: u32) -> Self {
        let cell_count = usize::try_from(edge)
            .map(|edge| edge.saturating_mul(edge))
            .unwrap_or(0);
        Self {
            size: edge,
            cells: vec![Vec::new(); cell_count],
        }
    }

    /// Edge length of the covered board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Appends a marker to the square's list; out-of-range squares are ignored.
    pub fn push(&mut self, square: SquareCoord, marker: AttackMarker) {
        if let Some(index) = self.index(square) {
            if let Some(cell) = self.cells.get_mut(index) {
                cell.push(marker);
            }
        }
    }

    /// Markers accumulated on the provided square, empty when out of range.
    #[must_use]
    pub fn at(&self, square: SquareCoord) -> &[AttackMarker] {
        self.index(square)
            .and_then(|index| self.cells.get(index))
            .map_or(&[], Vec::as_slice)
    }

    /// Total number of markers accumulated across the whole grid.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    fn index(&self, square: SquareCoord) -> Option<usize> {
        if square.row() < self.size && square.col() < self.size {
            let row = usize::try_from(square.row()).ok()?;
            let col = usize::try_from(square.col()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + col)
        } else {
            None
        }
    }
}

/// Result of one full path recomputation over a board snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathReport {
    /// Board revision captured when the snapshot was taken.
    pub revision: u64,
    /// Attack markers accumulated per board square.
    pub markers: MarkerGrid,
    /// Directions in which each placed queen is attacked, keyed by its square.
    pub collisions: BTreeMap<SquareCoord, Vec<Direction>>,
    /// Number of shelf queens, excluding any queen mid-drag.
    pub available_queens: u32,
}

impl PathReport {
    /// Reports whether no placed queen is currently attacked.
    #[must_use]
    pub fn is_conflict_free(&self) -> bool {
        self.collisions.is_empty()
    }
}

/// Best completion times keyed by board size, persisted across sessions.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestTimes {
    times: BTreeMap<u32, u64>,
}

impl BestTimes {
    /// Creates an empty best-time table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored best completion time for the provided board size, if any.
    #[must_use]
    pub fn best_for(&self, size: BoardSize) -> Option<u64> {
        self.times.get(&size.get()).copied()
    }

    /// Records the time iff it strictly improves the stored best.
    ///
    /// Returns `true` when the table changed; ties leave the table untouched.
    pub fn record_if_better(&mut self, size: BoardSize, millis: u64) -> bool {
        match self.times.get(&size.get()) {
            Some(best) if *best <= millis => false,
            _ => {
                let _ = self.times.insert(size.get(), millis);
                true
            }
        }
    }

    /// Iterates stored entries as `(size, millis)` pairs in size order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.times.iter().map(|(size, millis)| (*size, *millis))
    }

    /// Reports whether no best time has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl FromIterator<(u32, u64)> for BestTimes {
    fn from_iter<I: IntoIterator<Item = (u32, u64)>>(iter: I) -> Self {
        Self {
            times: iter.into_iter().collect(),
        }
    }
}
