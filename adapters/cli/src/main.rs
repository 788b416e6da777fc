#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for Grid Defence matches.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use grid_defence_core::{CellCoord, Event, MatchStatus, PLACEMENT_COST};
use grid_defence_session::{Difficulty, Match, MatchConfig};
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    /// Start with 150 money.
    Easy,
    /// Start with 100 money.
    Normal,
    /// Start with 75 money.
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

/// Runs a Grid Defence match without a display, reporting progress on stdout.
#[derive(Debug, Parser)]
#[command(name = "grid-defence", version)]
struct Args {
    /// Difficulty preset selecting the starting money.
    #[arg(long, value_enum, default_value_t = DifficultyArg::Normal)]
    difficulty: DifficultyArg,

    /// Number of grid columns.
    #[arg(long, default_value_t = MatchConfig::DEFAULT_COLUMNS)]
    columns: u32,

    /// Number of grid rows.
    #[arg(long, default_value_t = MatchConfig::DEFAULT_ROWS)]
    rows: u32,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,

    /// Tower placement applied before the first tick, as `COLUMN,ROW`.
    /// Repeat the flag to place several towers; repeating a cell upgrades it.
    #[arg(long = "place", value_name = "COLUMN,ROW")]
    placements: Vec<String>,

    /// Spend spare money on seeded random placements while the match runs.
    #[arg(long)]
    auto_build: bool,

    /// Seed for the auto-builder's placement choices.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Print a status line every this many ticks (0 disables).
    #[arg(long, default_value_t = 900)]
    report_every: u64,
}

/// Entry point for the Grid Defence command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let difficulty = Difficulty::from(args.difficulty);
    let config = MatchConfig::new(args.columns, args.rows, difficulty.starting_money());
    let mut session = Match::new(config);

    println!(
        "starting match: {}x{} grid, {:?} difficulty, {} money",
        args.columns,
        args.rows,
        args.difficulty,
        session.snapshot().money
    );

    for placement in &args.placements {
        let cell = parse_cell(placement)?;
        match session.place_or_upgrade(cell) {
            Ok(outcome) => println!("placement {placement}: {outcome:?}"),
            Err(error) => println!("placement {placement} rejected: {error}"),
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    loop {
        let report = match session.advance() {
            Ok(report) => report,
            Err(over) => {
                println!("match already over: {:?}", over.status);
                break;
            }
        };

        for event in &report.events {
            describe_event(report.tick, event);
        }

        if args.auto_build && report.tick % 90 == 0 {
            auto_build(&mut session, &mut rng);
        }

        if args.report_every > 0 && report.tick % args.report_every == 0 {
            print_status(&session);
        }

        if session.snapshot().status != MatchStatus::Running || report.tick >= args.ticks {
            break;
        }
    }

    let snapshot = session.snapshot();
    println!(
        "finished at tick {}: {:?}, {} defeated, {} life left",
        snapshot.tick, snapshot.status, snapshot.defeated, snapshot.life
    );
    Ok(())
}

fn parse_cell(placement: &str) -> Result<CellCoord> {
    let Some((column, row)) = placement.split_once(',') else {
        bail!("placement `{placement}` must look like COLUMN,ROW");
    };
    let column: u32 = column
        .trim()
        .parse()
        .with_context(|| format!("invalid column in placement `{placement}`"))?;
    let row: u32 = row
        .trim()
        .parse()
        .with_context(|| format!("invalid row in placement `{placement}`"))?;
    Ok(CellCoord::new(column, row))
}

fn describe_event(tick: u64, event: &Event) {
    match event {
        Event::EnemyDefeated {
            bounty, defeated, ..
        } => println!("tick {tick}: enemy defeated (+{bounty} money, {defeated} total)"),
        Event::EnemyEscaped { life_remaining, .. } => {
            println!("tick {tick}: enemy escaped, {life_remaining} life left");
        }
        Event::TowerDestroyed { cell, .. } => println!(
            "tick {tick}: tower at ({}, {}) destroyed",
            cell.column(),
            cell.row()
        ),
        Event::MatchWon { defeated } => {
            println!("tick {tick}: match won after {defeated} defeats");
        }
        Event::MatchLost => println!("tick {tick}: match lost"),
        _ => {}
    }
}

fn auto_build(session: &mut Match, rng: &mut ChaCha8Rng) {
    if session.snapshot().money < PLACEMENT_COST {
        return;
    }
    let (columns, rows) = session.grid_dimensions();
    let spawn = session.spawn_cell();
    let goal = session.goal_cell();

    // A handful of attempts per cycle; rejected cells are simply skipped.
    for _ in 0..8 {
        let cell = CellCoord::new(rng.gen_range(0..columns), rng.gen_range(0..rows));
        if cell == spawn || cell == goal {
            continue;
        }
        if session.place_or_upgrade(cell).is_ok() {
            return;
        }
    }
}

fn print_status(session: &Match) {
    let snapshot = session.snapshot();
    println!(
        "tick {} | money {} | life {} | defeated {}/{} | enemies {} | towers {}",
        snapshot.tick,
        snapshot.money,
        snapshot.life,
        snapshot.defeated,
        snapshot.win_threshold,
        session.enemies().iter().count(),
        session.towers().iter().count()
    );
}
