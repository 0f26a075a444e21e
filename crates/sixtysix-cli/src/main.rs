use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{Level, event};
use tracing_subscriber::EnvFilter;

use sixtysix_bot::PolicyKind;
use sixtysix_cli::render::{SeatNames, describe_match};
use sixtysix_cli::{Narrator, TerminalPolicy};
use sixtysix_core::game::driver::{Seats, play_match, play_round};
use sixtysix_core::game::match_state::{MATCH_TARGET, MatchState};
use sixtysix_core::model::player::PlayerPosition;

/// Sixty-Six at the terminal, against a computer opponent.
#[derive(Debug, Parser)]
#[command(name = "sixtysix", author, version, about = "Two-player Sixty-Six card game")]
struct Cli {
    /// Seed for a reproducible match (deals and bot tie-breaks).
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Computer opponent: random or greedy.
    #[arg(long, value_name = "KIND", default_value = "greedy")]
    opponent: PolicyKind,

    /// Log level for diagnostics on stderr (RUST_LOG takes precedence).
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: Level,

    /// Let two bots play the whole match and print the transcript.
    #[arg(long)]
    auto: bool,

    /// Game points needed to win the match.
    #[arg(long, value_name = "POINTS", default_value_t = MATCH_TARGET)]
    target: u32,
}

fn init_tracing(level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);
    if cli.target == 0 {
        bail!("--target must be at least 1");
    }

    let seed = cli.seed.unwrap_or_else(rand::random);
    event!(Level::INFO, seed, opponent = %cli.opponent, auto = cli.auto, "starting match");

    if cli.auto {
        run_auto(seed, &cli)
    } else {
        run_interactive(seed, &cli)
    }
}

/// Bot against bot, transcript on stdout.
fn run_auto(seed: u64, cli: &Cli) -> Result<()> {
    let names = SeatNames::new(
        format!("South ({})", PolicyKind::Greedy),
        format!("North ({})", cli.opponent),
    );
    let stdout = io::stdout();
    let mut south = Narrator::new(
        PolicyKind::Greedy.build(seed),
        stdout.lock(),
        names.clone(),
    );
    let mut north = cli.opponent.build(seed.wrapping_add(1));
    south.line(&format!("Seed: {seed}"))?;

    let mut state = MatchState::with_target(seed, cli.target);
    let result = {
        let mut seats: Seats<'_> = [&mut south, &mut *north];
        play_match(&mut state, &mut seats).context("engine rejected a bot action")?
    };
    south.line(&describe_match(&result, &names))?;
    south.into_output().flush()?;
    Ok(())
}

fn run_interactive(seed: u64, cli: &Cli) -> Result<()> {
    let human_seat = PlayerPosition::South;
    let stdin = io::stdin();
    let mut human = TerminalPolicy::new(stdin.lock(), io::stdout(), human_seat, "Computer");
    human.show_welcome();
    if human.hung_up() {
        bail!("no input available; use --auto for an unattended match");
    }

    let mut match_seed = seed;
    loop {
        let mut computer = cli.opponent.build(match_seed.wrapping_add(1));
        let mut state = MatchState::with_target(match_seed, cli.target);

        while !state.is_over() {
            human.set_match_points(*state.game_points().standings());
            {
                let mut seats: Seats<'_> = [&mut human, &mut *computer];
                play_round(state.round_mut(), &mut seats)
                    .context("engine rejected an action")?;
            }
            if human.hung_up() {
                bail!("input closed; abandoning the match");
            }
            state.finish_round_and_start_next()?;

            let points = state.game_points().standings();
            human.say(&format!(
                "\nMatch score: You {} - {} Computer",
                points[human_seat.index()],
                points[human_seat.opponent().index()]
            ));
            if !state.is_over() {
                let _ = human.ask("Press Enter for next round...");
            }
        }

        if let Some(result) = state.result() {
            human.say(&describe_match(&result, human.names()));
            human.say(if result.winner == human_seat {
                "CONGRATULATIONS! You win the match!"
            } else {
                "Computer wins the match! Better luck next time!"
            });
        }

        if !human.confirm("Play another match? (y/n): ") {
            human.say("Thanks for playing! Goodbye!");
            return Ok(());
        }
        match_seed = match_seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    }
}
