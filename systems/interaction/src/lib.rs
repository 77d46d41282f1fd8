#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure interaction system translating pointer gestures into world commands.

use nqueens_core::{Command, Event, Phase, QueenId, ScreenPoint, SquareCoord};

/// Pointer gesture distilled from adapter-provided input for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// A press-and-release at a window-space point.
    Tap {
        /// Location of the tap.
        point: ScreenPoint,
    },
    /// The pointer grabbed a queen token.
    DragStart {
        /// Queen under the pointer when the drag began.
        queen: QueenId,
    },
    /// The pointer moved while holding a queen token.
    DragMove {
        /// Queen being dragged.
        queen: QueenId,
        /// Pointer movement since the previous update.
        delta: ScreenPoint,
    },
    /// The pointer released a queen token.
    DragEnd {
        /// Queen being released.
        queen: QueenId,
    },
}

/// Interaction system that resolves gestures against the board layout.
///
/// Taps place or return queens depending on occupancy; drags pass through as
/// drag commands. Gestures are suppressed while no board is sized or the
/// puzzle is complete, mirroring an input surface that stops forwarding
/// board touches once the celebration runs.
#[derive(Debug, Clone)]
pub struct Interaction {
    phase: Phase,
}

impl Default for Interaction {
    fn default() -> Self {
        Self { phase: Phase::Idle }
    }
}

impl Interaction {
    /// Creates a new interaction system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    /// Consumes world events and frame gestures to emit session commands.
    ///
    /// The `square_under` closure should mirror the world's
    /// `query::square_under_point` helper and `occupant_at` its
    /// `query::occupant` helper, so the system resolves taps against the
    /// same geometry the renderer draws.
    pub fn handle<F, G>(
        &mut self,
        events: &[Event],
        gestures: &[Gesture],
        mut square_under: F,
        mut occupant_at: G,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(ScreenPoint) -> Option<SquareCoord>,
        G: FnMut(SquareCoord) -> Option<QueenId>,
    {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        if !matches!(self.phase, Phase::Setup | Phase::Playing) {
            return;
        }

        for gesture in gestures {
            match gesture {
                Gesture::Tap { point } => {
                    let Some(square) = square_under(*point) else {
                        continue;
                    };
                    match occupant_at(square) {
                        Some(queen) => out.push(Command::ReturnQueen { queen }),
                        None => out.push(Command::PlaceQueen { square }),
                    }
                }
                Gesture::DragStart { queen } => {
                    out.push(Command::BeginDrag { queen: *queen });
                }
                Gesture::DragMove { queen, delta } => {
                    out.push(Command::DragBy {
                        queen: *queen,
                        delta: *delta,
                    });
                }
                Gesture::DragEnd { queen } => {
                    out.push(Command::EndDrag { queen: *queen });
                }
            }
        }
    }
}
