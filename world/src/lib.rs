#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for the N-Queens engine.
//!
//! The [`World`] owns the board, the queens, the lifecycle phase, and the
//! play clock. Every mutation enters through [`apply`], which executes a
//! [`Command`] and broadcasts [`Event`] values; reads go through the
//! [`query`] module. Path recomputation itself is pure and runs over a
//! snapshot, so schedulers may defer it and publish the result back as a
//! command.

mod board;
mod paths;
mod timer;

use std::time::Duration;

use nqueens_core::{
    BestTimes, BoardSize, Command, Event, PathReport, Phase, QueenId, ScreenPoint, SquareCoord,
    WELCOME_BANNER,
};

use crate::{board::Board, timer::PlayTimer};

/// Square edges never grow beyond this many pixels regardless of surface size.
const MAX_SQUARE_SIZE: f32 = 80.0;
/// Glide pace: 500 ms of travel per 1200 px of distance.
const GLIDE_MILLIS_PER_PIXEL: f32 = 500.0 / 1200.0;

/// Represents the authoritative N-Queens session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Board,
    size: Option<BoardSize>,
    queens: Vec<Queen>,
    phase: Phase,
    drag: Option<DragState>,
    glides: Vec<Glide>,
    timer: PlayTimer,
    show_moves: bool,
    best_times: BestTimes,
    shelf_origin: ScreenPoint,
    square_size: f32,
    revision: u64,
    report: Option<PathReport>,
}

impl World {
    /// Creates an idle session awaiting its first board size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            board: Board::empty(),
            size: None,
            queens: Vec::new(),
            phase: Phase::Idle,
            drag: None,
            glides: Vec::new(),
            timer: PlayTimer::default(),
            show_moves: false,
            best_times: BestTimes::new(),
            shelf_origin: ScreenPoint::ZERO,
            square_size: 0.0,
            revision: 0,
            report: None,
        }
    }

    fn queen_index(&self, queen: QueenId) -> Option<usize> {
        self.queens.iter().position(|candidate| candidate.id == queen)
    }

    fn interactive(&self) -> bool {
        matches!(self.phase, Phase::Setup | Phase::Playing)
    }

    fn begin_play(&mut self, out_events: &mut Vec<Event>) {
        if self.phase == Phase::Setup {
            self.phase = Phase::Playing;
            self.timer.begin();
            out_events.push(Event::PhaseChanged {
                phase: Phase::Playing,
            });
        }
    }

    fn mark_changed(&mut self, out_events: &mut Vec<Event>) {
        self.revision = self.revision.wrapping_add(1);
        out_events.push(Event::BoardChanged {
            revision: self.revision,
        });
    }

    fn begin_glide(&mut self, queen: QueenId, to: ScreenPoint) {
        let Some(index) = self.queen_index(queen) else {
            return;
        };
        let from = self.queens[index].position;
        let millis = from.distance_to(to) * GLIDE_MILLIS_PER_PIXEL;
        self.glides.retain(|glide| glide.queen != queen);
        self.glides.push(Glide {
            queen,
            from,
            to,
            duration: Duration::from_millis(millis as u64),
            elapsed: Duration::ZERO,
        });
    }

    /// Window-space glide destination for a queen bound to the square.
    fn glide_target(&self, square: SquareCoord) -> ScreenPoint {
        let origin = self
            .board
            .square(square)
            .map(|state| state.rect.origin)
            .unwrap_or(ScreenPoint::ZERO);
        ScreenPoint::new(
            origin.x - self.shelf_origin.x,
            origin.y - self.shelf_origin.y,
        )
    }

    fn advance_glides(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let queens = &mut self.queens;
        let mut settled = false;

        self.glides.retain_mut(|glide| {
            let Some(queen) = queens.iter_mut().find(|queen| queen.id == glide.queen) else {
                return false;
            };

            glide.elapsed = glide.elapsed.saturating_add(dt);
            if glide.elapsed >= glide.duration {
                queen.position = glide.to;
                settled = true;
                false
            } else {
                let progress = glide.elapsed.as_secs_f32() / glide.duration.as_secs_f32();
                queen.position = lerp(glide.from, glide.to, progress);
                true
            }
        });

        // A settled glide re-requests paths so overlays catch up, exactly as
        // placements do; the board itself did not move, so the revision holds.
        if settled {
            out_events.push(Event::BoardChanged {
                revision: self.revision,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { size } => {
            world.board = Board::new(size);
            world.size = Some(size);
            world.queens = (0..size.get()).map(|id| Queen::new(QueenId::new(id))).collect();
            world.phase = Phase::Setup;
            world.drag = None;
            world.glides.clear();
            world.timer.halt();
            world.report = None;

            out_events.push(Event::BoardConfigured { size });
            out_events.push(Event::PhaseChanged { phase: Phase::Setup });
            world.mark_changed(out_events);
        }
        Command::LayoutReady { width, height } => {
            let edge = world.board.size();
            if edge == 0 {
                return;
            }
            world.square_size = (width.min(height) / edge as f32).min(MAX_SQUARE_SIZE);
        }
        Command::SyncSquareGeometry {
            square,
            origin,
            size,
        } => {
            world.board.set_geometry(square, origin, size);
        }
        Command::SyncShelfOrigin { origin } => {
            world.shelf_origin = origin;
        }
        Command::SetShowMoves { show } => {
            if world.show_moves != show {
                world.show_moves = show;
                out_events.push(Event::ShowMovesChanged { show });
            }
        }
        Command::RestoreBestTimes { times } => {
            world.best_times = times;
        }
        Command::PlaceQueen { square } => {
            if !world.interactive() || world.board.has_occupant(square) {
                return;
            }
            if world.board.square(square).is_none() {
                return;
            }
            let Some(index) = world.queens.iter().rposition(|queen| queen.square.is_none())
            else {
                return;
            };

            let queen = world.queens[index].id;
            world.queens[index].square = Some(square);
            world.board.set_occupant(square, Some(queen));
            let destination = world.glide_target(square);
            world.begin_glide(queen, destination);

            out_events.push(Event::QueenPlaced { queen, square });
            world.begin_play(out_events);
            world.mark_changed(out_events);
        }
        Command::ReturnQueen { queen } => {
            if !world.interactive() {
                return;
            }
            let Some(index) = world.queen_index(queen) else {
                return;
            };
            let Some(square) = world.queens[index].square.take() else {
                return;
            };

            world.board.set_occupant(square, None);
            world.begin_glide(queen, ScreenPoint::ZERO);

            out_events.push(Event::QueenReturned { queen });
            world.mark_changed(out_events);
        }
        Command::BeginDrag { queen } => {
            if !world.interactive() {
                return;
            }
            let Some(index) = world.queen_index(queen) else {
                return;
            };

            world.glides.retain(|glide| glide.queen != queen);
            world.drag = Some(DragState {
                queen,
                hover: world.queens[index].square,
            });
            world.begin_play(out_events);
        }
        Command::DragBy { queen, delta } => {
            if world.drag.as_ref().map(|drag| drag.queen) != Some(queen) {
                return;
            }
            let Some(index) = world.queen_index(queen) else {
                return;
            };

            world.queens[index].position.x += delta.x;
            world.queens[index].position.y += delta.y;

            // The centre of the dragged token decides which square is hovered.
            let half = world.square_size / 2.0;
            let point = ScreenPoint::new(
                world.shelf_origin.x + half + world.queens[index].position.x,
                world.shelf_origin.y + half + world.queens[index].position.y,
            );
            let hovered = world.board.square_under_point(point);

            let previous = world.drag.as_ref().and_then(|drag| drag.hover);
            if hovered != previous {
                if let Some(square) = previous {
                    if world.board.occupant(square) == Some(queen) {
                        world.board.set_occupant(square, None);
                        world.queens[index].square = None;
                    }
                }
                if let Some(drag) = world.drag.as_mut() {
                    drag.hover = hovered;
                }
            }

            if let Some(square) = hovered {
                if world.board.occupant(square).is_none() {
                    world.board.set_occupant(square, Some(queen));
                    world.queens[index].square = Some(square);
                }
            }

            world.mark_changed(out_events);
        }
        Command::EndDrag { queen } => {
            if world.drag.as_ref().map(|drag| drag.queen) != Some(queen) {
                return;
            }
            world.drag = None;

            let Some(index) = world.queen_index(queen) else {
                return;
            };
            let destination = match world.queens[index].square {
                Some(square) => world.glide_target(square),
                None => ScreenPoint::ZERO,
            };
            world.begin_glide(queen, destination);
            world.mark_changed(out_events);
        }
        Command::Restart => {
            if world.phase == Phase::Idle {
                return;
            }

            let placed: Vec<(QueenId, SquareCoord)> = world
                .queens
                .iter()
                .filter_map(|queen| queen.square.map(|square| (queen.id, square)))
                .collect();
            for (queen, square) in placed {
                world.board.set_occupant(square, None);
                if let Some(index) = world.queen_index(queen) {
                    world.queens[index].square = None;
                }
                world.begin_glide(queen, ScreenPoint::ZERO);
                out_events.push(Event::QueenReturned { queen });
            }

            world.drag = None;
            if world.phase != Phase::Playing {
                world.phase = Phase::Playing;
                out_events.push(Event::PhaseChanged {
                    phase: Phase::Playing,
                });
            }
            world.timer.begin();
            world.mark_changed(out_events);
        }
        Command::Tick { dt } => {
            world.timer.advance(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_glides(dt, out_events);
        }
        Command::PublishPathReport { report } => {
            if report.revision != world.revision {
                out_events.push(Event::PathReportDiscarded {
                    revision: report.revision,
                });
                return;
            }

            out_events.push(Event::PathReportApplied {
                revision: report.revision,
            });

            let solved = world.phase == Phase::Playing
                && report.is_conflict_free()
                && report.available_queens == 0
                && world.drag.is_none();
            world.report = Some(report);

            if solved {
                if let Some(size) = world.size {
                    world.timer.halt();
                    world.phase = Phase::Complete;
                    out_events.push(Event::PhaseChanged {
                        phase: Phase::Complete,
                    });

                    let elapsed_millis = world.timer.elapsed_millis();
                    if world.best_times.record_if_better(size, elapsed_millis) {
                        out_events.push(Event::BestTimeRecorded {
                            size,
                            millis: elapsed_millis,
                        });
                    }
                    out_events.push(Event::PuzzleCompleted {
                        size,
                        elapsed_millis,
                    });
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use nqueens_core::{
        BestTimes, BoardSize, PathReport, Phase, QueenId, ScreenPoint, ScreenRect, SquareCoord,
    };

    use super::{paths, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Edge length of the configured board, if one has been sized.
    #[must_use]
    pub fn board_size(world: &World) -> Option<BoardSize> {
        world.size
    }

    /// Pixel edge of a rendered square, zero before the first layout pass.
    #[must_use]
    pub fn square_size(world: &World) -> f32 {
        world.square_size
    }

    /// Window-space origin of the queen shelf.
    #[must_use]
    pub fn shelf_origin(world: &World) -> ScreenPoint {
        world.shelf_origin
    }

    /// Whether the move-path overlay preference is enabled.
    #[must_use]
    pub fn show_moves(world: &World) -> bool {
        world.show_moves
    }

    /// Elapsed play time in milliseconds, quantized to whole seconds.
    #[must_use]
    pub fn elapsed_millis(world: &World) -> u64 {
        world.timer.elapsed_millis()
    }

    /// Whether the play clock is currently accruing time.
    #[must_use]
    pub fn timer_running(world: &World) -> bool {
        world.timer.is_running()
    }

    /// Best completion times restored and recorded so far.
    #[must_use]
    pub fn best_times(world: &World) -> &BestTimes {
        &world.best_times
    }

    /// Queen currently held by the pointer, if a drag is in progress.
    #[must_use]
    pub fn dragged_queen(world: &World) -> Option<QueenId> {
        world.drag.as_ref().map(|drag| drag.queen)
    }

    /// Queen bound to the square, if the square exists and is occupied.
    #[must_use]
    pub fn occupant(world: &World, square: SquareCoord) -> Option<QueenId> {
        world.board.occupant(square)
    }

    /// Square whose rectangle strictly contains the window-space point.
    #[must_use]
    pub fn square_under_point(world: &World, point: ScreenPoint) -> Option<SquareCoord> {
        world.board.square_under_point(point)
    }

    /// Most recent path report applied to the session, if any.
    #[must_use]
    pub fn path_report(world: &World) -> Option<&PathReport> {
        world.report.as_ref()
    }

    /// Runs the path engine over the current snapshot.
    ///
    /// The result is stamped with the present board revision; schedulers
    /// publish it back through `Command::PublishPathReport`, which discards
    /// it if the board moved on in the meantime.
    #[must_use]
    pub fn compute_path_report(world: &World) -> PathReport {
        paths::compute(
            &world.board,
            &world.queens,
            dragged_queen(world),
            world.revision,
        )
    }

    /// Captures a read-only view of the queens in identifier order.
    #[must_use]
    pub fn queen_view(world: &World) -> QueenView {
        let mut snapshots: Vec<QueenSnapshot> = world
            .queens
            .iter()
            .map(|queen| QueenSnapshot {
                id: queen.id,
                square: queen.square,
                position: queen.position,
                gliding: world.glides.iter().any(|glide| glide.queen == queen.id),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        QueenView { snapshots }
    }

    /// Captures a read-only view of the board squares in row-major order.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView {
        BoardView {
            snapshots: world
                .board
                .squares()
                .map(|square| SquareSnapshot {
                    coord: square.coord,
                    light: square.light,
                    occupant: square.occupant,
                    rect: square.rect,
                })
                .collect(),
        }
    }

    /// Read-only snapshot describing all queens in the session.
    #[derive(Clone, Debug)]
    pub struct QueenView {
        snapshots: Vec<QueenSnapshot>,
    }

    impl QueenView {
        /// Iterator over the captured queen snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &QueenSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<QueenSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single queen's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct QueenSnapshot {
        /// Identifier assigned to the queen when the board was sized.
        pub id: QueenId,
        /// Square the queen is bound to, or `None` while on the shelf.
        pub square: Option<SquareCoord>,
        /// Pixel offset of the queen's token relative to the shelf origin.
        pub position: ScreenPoint,
        /// Whether a glide animation currently owns the token.
        pub gliding: bool,
    }

    /// Read-only snapshot describing all board squares.
    #[derive(Clone, Debug)]
    pub struct BoardView {
        snapshots: Vec<SquareSnapshot>,
    }

    impl BoardView {
        /// Iterator over the captured square snapshots in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = &SquareSnapshot> {
            self.snapshots.iter()
        }
    }

    /// Immutable representation of a single square's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct SquareSnapshot {
        /// Board coordinate identifying the square.
        pub coord: SquareCoord,
        /// Whether the square renders with the light checkerboard shade.
        pub light: bool,
        /// Queen currently bound to the square, if any.
        pub occupant: Option<QueenId>,
        /// Window-space rectangle the square was last laid out at.
        pub rect: ScreenRect,
    }
}

/// A queen token: either on the shelf or bound to exactly one square.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Queen {
    pub(crate) id: QueenId,
    pub(crate) square: Option<SquareCoord>,
    pub(crate) position: ScreenPoint,
}

impl Queen {
    pub(crate) fn new(id: QueenId) -> Self {
        Self {
            id,
            square: None,
            position: ScreenPoint::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    queen: QueenId,
    hover: Option<SquareCoord>,
}

#[derive(Clone, Copy, Debug)]
struct Glide {
    queen: QueenId,
    from: ScreenPoint,
    to: ScreenPoint,
    duration: Duration,
    elapsed: Duration,
}

fn lerp(from: ScreenPoint, to: ScreenPoint, progress: f32) -> ScreenPoint {
    ScreenPoint::new(
        from.x + (to.x - from.x) * progress,
        from.y + (to.y - from.y) * progress,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nqueens_core::{ScreenSize, SquareCoord};

    const SOLVED_FOUR: [(u32, u32); 4] = [(1, 0), (3, 1), (2, 3), (0, 2)];

    fn sized_world(edge: i64) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureBoard {
                size: BoardSize::new(edge).expect("positive size"),
            },
            &mut events,
        );
        world
    }

    fn sync_layout(world: &mut World, edge: u32, square: f32) {
        let mut events = Vec::new();
        apply(
            world,
            Command::LayoutReady {
                width: edge as f32 * square,
                height: edge as f32 * square,
            },
            &mut events,
        );
        apply(
            world,
            Command::SyncShelfOrigin {
                origin: ScreenPoint::ZERO,
            },
            &mut events,
        );
        for row in 0..edge {
            for col in 0..edge {
                apply(
                    world,
                    Command::SyncSquareGeometry {
                        square: SquareCoord::new(row, col),
                        origin: ScreenPoint::new(col as f32 * square, row as f32 * square),
                        size: ScreenSize::new(square, square),
                    },
                    &mut events,
                );
            }
        }
    }

    fn place(world: &mut World, row: u32, col: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceQueen {
                square: SquareCoord::new(row, col),
            },
            &mut events,
        );
        events
    }

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    fn publish_fresh_report(world: &mut World) -> Vec<Event> {
        let report = query::compute_path_report(world);
        let mut events = Vec::new();
        apply(world, Command::PublishPathReport { report }, &mut events);
        events
    }

    #[test]
    fn configuring_the_board_resets_the_session() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureBoard {
                size: BoardSize::new(6).expect("positive size"),
            },
            &mut events,
        );

        assert_eq!(query::phase(&world), Phase::Setup);
        assert_eq!(query::board_size(&world).map(|size| size.get()), Some(6));
        assert_eq!(query::queen_view(&world).into_vec().len(), 6);
        assert!(events.contains(&Event::PhaseChanged { phase: Phase::Setup }));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::BoardChanged { .. })));
    }

    #[test]
    fn placement_binds_the_last_shelf_queen() {
        let mut world = sized_world(4);
        let events = place(&mut world, 0, 0);

        assert!(events.contains(&Event::QueenPlaced {
            queen: QueenId::new(3),
            square: SquareCoord::new(0, 0),
        }));
        assert_eq!(
            query::occupant(&world, SquareCoord::new(0, 0)),
            Some(QueenId::new(3))
        );
    }

    #[test]
    fn first_placement_starts_the_clock() {
        let mut world = sized_world(4);
        let events = place(&mut world, 0, 0);

        assert_eq!(query::phase(&world), Phase::Playing);
        assert!(events.contains(&Event::PhaseChanged {
            phase: Phase::Playing,
        }));
        assert!(query::timer_running(&world));

        let _ = tick(&mut world, 2_000);
        assert_eq!(query::elapsed_millis(&world), 2_000);
    }

    #[test]
    fn placement_on_an_occupied_square_is_ignored() {
        let mut world = sized_world(4);
        let _ = place(&mut world, 0, 0);
        let events = place(&mut world, 0, 0);

        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::QueenPlaced { .. })));
        assert_eq!(
            query::occupant(&world, SquareCoord::new(0, 0)),
            Some(QueenId::new(3))
        );
    }

    #[test]
    fn placement_outside_the_board_is_ignored() {
        let mut world = sized_world(4);
        let events = place(&mut world, 9, 9);

        assert!(events.is_empty());
        assert_eq!(query::phase(&world), Phase::Setup);
    }

    #[test]
    fn returning_a_queen_frees_its_square() {
        let mut world = sized_world(4);
        let _ = place(&mut world, 0, 0);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ReturnQueen {
                queen: QueenId::new(3),
            },
            &mut events,
        );

        assert!(events.contains(&Event::QueenReturned {
            queen: QueenId::new(3),
        }));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::BoardChanged { .. })));
        assert_eq!(query::occupant(&world, SquareCoord::new(0, 0)), None);
    }

    #[test]
    fn solving_the_four_board_completes_the_session() {
        let mut world = sized_world(4);
        for (row, col) in SOLVED_FOUR {
            let _ = place(&mut world, row, col);
        }
        let _ = tick(&mut world, 9_000);
        let events = publish_fresh_report(&mut world);

        assert_eq!(query::phase(&world), Phase::Complete);
        assert!(events.contains(&Event::PuzzleCompleted {
            size: BoardSize::new(4).expect("positive size"),
            elapsed_millis: 9_000,
        }));
        assert!(events.contains(&Event::BestTimeRecorded {
            size: BoardSize::new(4).expect("positive size"),
            millis: 9_000,
        }));

        // The clock halts on completion.
        let _ = tick(&mut world, 5_000);
        assert_eq!(query::elapsed_millis(&world), 9_000);
    }

    #[test]
    fn conflicting_placements_do_not_complete_the_session() {
        let mut world = sized_world(4);
        let _ = place(&mut world, 1, 0);
        let _ = place(&mut world, 2, 0);
        let _ = place(&mut world, 0, 2);
        let _ = place(&mut world, 3, 3);
        let events = publish_fresh_report(&mut world);

        assert_eq!(query::phase(&world), Phase::Playing);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::PuzzleCompleted { .. })));
        let report = query::path_report(&world).expect("report applied");
        assert!(!report.is_conflict_free());
    }

    #[test]
    fn stale_reports_are_discarded() {
        let mut world = sized_world(4);
        let _ = place(&mut world, 1, 0);
        let stale = query::compute_path_report(&world);

        let _ = place(&mut world, 2, 0);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PublishPathReport { report: stale },
            &mut events,
        );
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PathReportDiscarded { .. })));
        assert!(query::path_report(&world).is_none());

        let events = publish_fresh_report(&mut world);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::PathReportApplied { .. })));
        let report = query::path_report(&world).expect("fresh report applied");
        assert_eq!(report.collisions.len(), 2);
    }

    #[test]
    fn slower_completions_leave_the_best_time_untouched() {
        let mut world = sized_world(4);
        for (row, col) in SOLVED_FOUR {
            let _ = place(&mut world, row, col);
        }
        let _ = tick(&mut world, 9_000);
        let _ = publish_fresh_report(&mut world);

        let mut events = Vec::new();
        apply(&mut world, Command::Restart, &mut events);
        let _ = tick(&mut world, 12_000);
        for (row, col) in SOLVED_FOUR {
            let _ = place(&mut world, row, col);
        }
        let events = publish_fresh_report(&mut world);

        assert_eq!(query::phase(&world), Phase::Complete);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::BestTimeRecorded { .. })));
        let size = BoardSize::new(4).expect("positive size");
        assert_eq!(query::best_times(&world).best_for(size), Some(9_000));
    }

    #[test]
    fn restart_returns_every_queen_and_restarts_the_clock() {
        let mut world = sized_world(4);
        for (row, col) in SOLVED_FOUR {
            let _ = place(&mut world, row, col);
        }
        let _ = tick(&mut world, 3_000);
        let _ = publish_fresh_report(&mut world);
        assert_eq!(query::phase(&world), Phase::Complete);

        let mut events = Vec::new();
        apply(&mut world, Command::Restart, &mut events);

        assert_eq!(query::phase(&world), Phase::Playing);
        assert_eq!(query::elapsed_millis(&world), 0);
        assert!(query::timer_running(&world));
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::QueenReturned { .. }))
                .count(),
            4
        );
        assert!(query::queen_view(&world)
            .iter()
            .all(|queen| queen.square.is_none()));
    }

    #[test]
    fn mutations_are_ignored_once_complete() {
        let mut world = sized_world(4);
        for (row, col) in SOLVED_FOUR {
            let _ = place(&mut world, row, col);
        }
        let _ = publish_fresh_report(&mut world);
        assert_eq!(query::phase(&world), Phase::Complete);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ReturnQueen {
                queen: QueenId::new(0),
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert_eq!(query::phase(&world), Phase::Complete);
        assert_eq!(
            query::occupant(&world, SquareCoord::new(1, 0)),
            Some(QueenId::new(3))
        );
    }

    #[test]
    fn completion_waits_for_the_drag_to_end() {
        let mut world = sized_world(4);
        for (row, col) in SOLVED_FOUR {
            let _ = place(&mut world, row, col);
        }

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BeginDrag {
                queen: QueenId::new(0),
            },
            &mut events,
        );
        let _ = publish_fresh_report(&mut world);
        assert_eq!(query::phase(&world), Phase::Playing);

        apply(
            &mut world,
            Command::EndDrag {
                queen: QueenId::new(0),
            },
            &mut events,
        );
        let _ = publish_fresh_report(&mut world);
        assert_eq!(query::phase(&world), Phase::Complete);
    }

    #[test]
    fn dragging_binds_the_hovered_empty_square() {
        let mut world = sized_world(4);
        sync_layout(&mut world, 4, 50.0);

        let queen = QueenId::new(0);
        let mut events = Vec::new();
        apply(&mut world, Command::BeginDrag { queen }, &mut events);
        apply(
            &mut world,
            Command::DragBy {
                queen,
                delta: ScreenPoint::new(60.0, 60.0),
            },
            &mut events,
        );

        // Token centre lands at (85, 85), inside square (1, 1).
        assert_eq!(
            query::occupant(&world, SquareCoord::new(1, 1)),
            Some(queen)
        );

        apply(&mut world, Command::EndDrag { queen }, &mut events);
        let snapshot = query::queen_view(&world)
            .into_vec()
            .into_iter()
            .find(|candidate| candidate.id == queen)
            .expect("queen snapshot");
        assert_eq!(snapshot.square, Some(SquareCoord::new(1, 1)));
        assert!(snapshot.gliding);
    }

    #[test]
    fn dragging_off_a_square_unbinds_it() {
        let mut world = sized_world(4);
        sync_layout(&mut world, 4, 50.0);

        let queen = QueenId::new(0);
        let mut events = Vec::new();
        apply(&mut world, Command::BeginDrag { queen }, &mut events);
        apply(
            &mut world,
            Command::DragBy {
                queen,
                delta: ScreenPoint::new(60.0, 60.0),
            },
            &mut events,
        );
        assert_eq!(
            query::occupant(&world, SquareCoord::new(1, 1)),
            Some(queen)
        );

        apply(
            &mut world,
            Command::DragBy {
                queen,
                delta: ScreenPoint::new(50.0, 0.0),
            },
            &mut events,
        );
        assert_eq!(query::occupant(&world, SquareCoord::new(1, 1)), None);
        assert_eq!(
            query::occupant(&world, SquareCoord::new(1, 2)),
            Some(queen)
        );
    }

    #[test]
    fn dragging_over_an_occupied_square_leaves_the_queen_unbound() {
        let mut world = sized_world(4);
        sync_layout(&mut world, 4, 50.0);
        let _ = place(&mut world, 1, 1);

        let queen = QueenId::new(0);
        let mut events = Vec::new();
        apply(&mut world, Command::BeginDrag { queen }, &mut events);
        apply(
            &mut world,
            Command::DragBy {
                queen,
                delta: ScreenPoint::new(60.0, 60.0),
            },
            &mut events,
        );
        assert_eq!(
            query::occupant(&world, SquareCoord::new(1, 1)),
            Some(QueenId::new(3))
        );

        apply(&mut world, Command::EndDrag { queen }, &mut events);
        let snapshot = query::queen_view(&world)
            .into_vec()
            .into_iter()
            .find(|candidate| candidate.id == queen)
            .expect("queen snapshot");
        assert_eq!(snapshot.square, None);
    }

    #[test]
    fn settled_glides_land_queens_exactly_and_request_paths() {
        let mut world = sized_world(4);
        sync_layout(&mut world, 4, 50.0);
        let _ = place(&mut world, 1, 1);

        let events = tick(&mut world, 1_000);
        assert!(events.contains(&Event::BoardChanged {
            revision: world.revision,
        }));

        let snapshot = query::queen_view(&world)
            .into_vec()
            .into_iter()
            .find(|candidate| candidate.id == QueenId::new(3))
            .expect("queen snapshot");
        assert!(!snapshot.gliding);
        assert_eq!(snapshot.position, ScreenPoint::new(50.0, 50.0));
    }

    #[test]
    fn layout_ready_caps_the_square_size() {
        let mut world = sized_world(4);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LayoutReady {
                width: 1_000.0,
                height: 1_000.0,
            },
            &mut events,
        );
        assert_eq!(query::square_size(&world), 80.0);

        apply(
            &mut world,
            Command::LayoutReady {
                width: 200.0,
                height: 320.0,
            },
            &mut events,
        );
        assert_eq!(query::square_size(&world), 50.0);
    }

    #[test]
    fn show_moves_toggle_announces_changes_once() {
        let mut world = sized_world(4);
        let mut events = Vec::new();

        apply(&mut world, Command::SetShowMoves { show: true }, &mut events);
        apply(&mut world, Command::SetShowMoves { show: true }, &mut events);
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::ShowMovesChanged { .. }))
                .count(),
            1
        );
        assert!(query::show_moves(&world));
    }

    #[test]
    fn restored_best_times_gate_later_recordings() {
        let mut world = sized_world(4);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RestoreBestTimes {
                times: [(4, 5_000)].into_iter().collect(),
            },
            &mut events,
        );

        for (row, col) in SOLVED_FOUR {
            let _ = place(&mut world, row, col);
        }
        let _ = tick(&mut world, 9_000);
        let events = publish_fresh_report(&mut world);

        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::BestTimeRecorded { .. })));
        let size = BoardSize::new(4).expect("positive size");
        assert_eq!(query::best_times(&world).best_for(size), Some(5_000));
    }
}
