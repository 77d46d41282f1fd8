#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots a headless N-Queens session.
//!
//! The binary seeds a session from the preference store, lays out a synthetic
//! render surface, and optionally replays a solution in real time through the
//! full command/event/system loop: taps flow through the interaction system,
//! recomputation through the path scheduler, and the celebration through the
//! fireworks system. Improved best times are persisted on the way out.

mod scheduler;
mod solution;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};
use clap::Parser;
use nqueens_core::{BoardSize, Command, Event, Phase, ScreenPoint, ScreenSize, SquareCoord};
use nqueens_persistence::PreferenceStore;
use nqueens_system_fireworks::{Config as FireworksConfig, Fireworks};
use nqueens_system_interaction::{Gesture, Interaction};
use nqueens_system_paths::PathScheduler;
use nqueens_world::{self as world, query, World};

use crate::solution::SolutionSnapshot;

/// Playable board sizes accepted at this boundary; the engine itself only
/// rejects non-positive sizes.
const MIN_PLAYABLE: i64 = 4;
const MAX_PLAYABLE: i64 = 16;
/// Edge of the synthetic square render surface fed to layout commands.
const SURFACE_EDGE: f32 = 640.0;
const FIREWORKS_SEED: u64 = 0x0051_ee4e_5eed;
/// Ticks granted for reports and glides to settle after the last placement.
const SETTLE_TICK_LIMIT: u32 = 40;
/// Synthetic ticks granted to the celebration before the summary prints.
const CELEBRATION_TICK_LIMIT: u32 = 60;

#[derive(Debug, Parser)]
#[command(name = "nqueens", about = "Headless N-Queens puzzle session")]
struct Args {
    /// Board edge length; falls back to the stored preference.
    #[arg(long)]
    size: Option<i64>,

    /// Enable the move-path overlay preference for this run.
    #[arg(long)]
    show_moves: bool,

    /// Encoded solution string to replay through the session.
    #[arg(long, conflicts_with = "place")]
    solution: Option<String>,

    /// Placement to replay, as a `row,col` pair; repeatable.
    #[arg(long = "place", value_name = "ROW,COL")]
    place: Vec<String>,

    /// Preference file location.
    #[arg(long, default_value = "nqueens-prefs.toml")]
    prefs: PathBuf,

    /// Milliseconds between session ticks during a replay.
    #[arg(long, default_value_t = 250)]
    tick_millis: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let store = PreferenceStore::new(&args.prefs);

    let requested = args.size.unwrap_or_else(|| i64::from(store.board_size()));
    let size = BoardSize::new(requested).context("validating the requested board size")?;
    ensure!(
        (MIN_PLAYABLE..=MAX_PLAYABLE).contains(&requested),
        "board size {requested} is outside the playable range {MIN_PLAYABLE}-{MAX_PLAYABLE}"
    );

    let placements = requested_placements(&args, size)?;

    let show_moves = args.show_moves || store.show_moves();
    store.set_board_size(size.get());
    if args.show_moves {
        store.set_show_moves(true);
    }

    let mut session = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut session,
        Command::RestoreBestTimes {
            times: store.best_times(),
        },
        &mut events,
    );
    world::apply(&mut session, Command::ConfigureBoard { size }, &mut events);
    world::apply(
        &mut session,
        Command::SetShowMoves { show: show_moves },
        &mut events,
    );
    sync_synthetic_layout(&mut session, &mut events);

    println!("{}", query::welcome_banner(&session));
    println!(
        "{0}x{0} board ready, move overlay {1}",
        size.get(),
        if show_moves { "on" } else { "off" }
    );

    if placements.is_empty() {
        print_best_times(&session);
        println!("pass --solution or --place to replay a solution");
        return Ok(());
    }

    replay(session, events, size, placements, &args, &store)
}

/// Resolves the placement list from the solution string or `--place` pairs.
fn requested_placements(args: &Args, size: BoardSize) -> Result<Vec<SquareCoord>> {
    if let Some(encoded) = &args.solution {
        let snapshot = SolutionSnapshot::decode(encoded)?;
        ensure!(
            snapshot.size == size.get(),
            "solution targets a {0}x{0} board but the session is {1}x{1}",
            snapshot.size,
            size.get()
        );
        return Ok(snapshot.placements);
    }

    args.place
        .iter()
        .map(|raw| parse_placement(raw, size))
        .collect()
}

fn parse_placement(raw: &str, size: BoardSize) -> Result<SquareCoord> {
    let (row, col) = raw
        .split_once(',')
        .ok_or_else(|| anyhow!("placement '{raw}' is not in row,col form"))?;
    let row: u32 = row
        .trim()
        .parse()
        .with_context(|| format!("parsing the row in '{raw}'"))?;
    let col: u32 = col
        .trim()
        .parse()
        .with_context(|| format!("parsing the column in '{raw}'"))?;
    ensure!(
        row < size.get() && col < size.get(),
        "placement '{raw}' lies outside the {0}x{0} board",
        size.get()
    );
    Ok(SquareCoord::new(row, col))
}

/// Feeds the session a synthetic square surface and per-square geometry.
fn sync_synthetic_layout(session: &mut World, events: &mut Vec<Event>) {
    world::apply(
        session,
        Command::LayoutReady {
            width: SURFACE_EDGE,
            height: SURFACE_EDGE,
        },
        events,
    );
    world::apply(
        session,
        Command::SyncShelfOrigin {
            origin: ScreenPoint::ZERO,
        },
        events,
    );

    let Some(size) = query::board_size(session) else {
        return;
    };
    let square = query::square_size(session);
    for row in 0..size.get() {
        for col in 0..size.get() {
            world::apply(
                session,
                Command::SyncSquareGeometry {
                    square: SquareCoord::new(row, col),
                    origin: ScreenPoint::new(col as f32 * square, row as f32 * square),
                    size: ScreenSize::new(square, square),
                },
                events,
            );
        }
    }
}

/// Drives the session loop in real time until the puzzle completes.
fn replay(
    mut session: World,
    mut events: Vec<Event>,
    size: BoardSize,
    placements: Vec<SquareCoord>,
    args: &Args,
    store: &PreferenceStore,
) -> Result<()> {
    let mut queue: VecDeque<SquareCoord> = placements.iter().copied().collect();
    let mut interaction = Interaction::default();
    let mut paths = PathScheduler::new();
    let mut fireworks = Fireworks::new(FireworksConfig::new(FIREWORKS_SEED));
    let mut ticker = scheduler::Ticker::start(Duration::from_millis(args.tick_millis.max(1)));
    let mut settle_ticks = 0u32;

    while query::phase(&session) != Phase::Complete {
        let Some(dt) = ticker.wait() else {
            break;
        };
        world::apply(&mut session, Command::Tick { dt }, &mut events);

        let mut gestures = Vec::new();
        if let Some(square) = queue.front().copied() {
            if let Some(point) = square_centre(&session, square) {
                gestures.push(Gesture::Tap { point });
                let _ = queue.pop_front();
            }
        }

        let mut commands = Vec::new();
        interaction.handle(
            &events,
            &gestures,
            |point| query::square_under_point(&session, point),
            |square| query::occupant(&session, square),
            &mut commands,
        );
        paths.handle(
            &events,
            || query::compute_path_report(&session),
            &mut commands,
        );
        fireworks.handle(&events);
        narrate(&events);

        let mut next_events = Vec::new();
        for command in commands {
            world::apply(&mut session, command, &mut next_events);
        }
        events = next_events;

        if queue.is_empty() {
            settle_ticks += 1;
            if settle_ticks > SETTLE_TICK_LIMIT {
                break;
            }
        }
    }
    ticker.cancel();

    fireworks.handle(&events);
    narrate(&events);

    if query::phase(&session) != Phase::Complete {
        let conflicts = query::path_report(&session)
            .map(|report| report.collisions.len())
            .unwrap_or(0);
        return Err(anyhow!(
            "placements leave the board unsolved with {conflicts} queens in conflict"
        ));
    }

    store.set_best_times(query::best_times(&session));
    print_best_times(&session);

    let mut spark_peak = fireworks.particles().len();
    let mut celebration_ticks = 0u32;
    while !fireworks.is_idle() && celebration_ticks < CELEBRATION_TICK_LIMIT {
        fireworks.handle(&[Event::TimeAdvanced {
            dt: Duration::from_millis(250),
        }]);
        spark_peak = spark_peak.max(fireworks.particles().len());
        celebration_ticks += 1;
    }
    println!("celebration peaked at {spark_peak} particles");

    let shareable = SolutionSnapshot {
        size: size.get(),
        placements,
    };
    println!("share this solution: {}", shareable.encode());
    Ok(())
}

/// Window-space centre of the square, once geometry has been synced.
fn square_centre(session: &World, square: SquareCoord) -> Option<ScreenPoint> {
    query::board_view(session)
        .iter()
        .find(|snapshot| snapshot.coord == square)
        .map(|snapshot| {
            ScreenPoint::new(
                snapshot.rect.origin.x + snapshot.rect.size.width / 2.0,
                snapshot.rect.origin.y + snapshot.rect.size.height / 2.0,
            )
        })
}

fn narrate(events: &[Event]) {
    for event in events {
        match event {
            Event::QueenPlaced { queen, square } => println!(
                "queen {} placed at ({}, {})",
                queen.get(),
                square.row(),
                square.col()
            ),
            Event::QueenReturned { queen } => {
                println!("queen {} returned to the shelf", queen.get());
            }
            Event::PuzzleCompleted {
                size,
                elapsed_millis,
            } => println!(
                "{0}x{0} puzzle solved in {1} s",
                size.get(),
                elapsed_millis / 1_000
            ),
            Event::BestTimeRecorded { size, millis } => println!(
                "new best time for {0}x{0}: {1} s",
                size.get(),
                millis / 1_000
            ),
            _ => {}
        }
    }
}

fn print_best_times(session: &World) {
    let times = query::best_times(session);
    if times.is_empty() {
        println!("no best times recorded yet");
        return;
    }
    for (size, millis) in times.iter() {
        println!("best time for {size}x{size}: {} s", millis / 1_000);
    }
}
