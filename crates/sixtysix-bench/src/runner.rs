use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use sixtysix_bot::PolicyKind;
use sixtysix_core::game::driver::{Seats, play_match};
use sixtysix_core::game::match_state::{MatchError, MatchResult, MatchState};
use sixtysix_core::game::policy::Policy;
use sixtysix_core::model::action::Action;
use sixtysix_core::model::event::RoundEvent;
use sixtysix_core::model::observation::ObservableState;
use sixtysix_core::model::player::PlayerPosition;
use sixtysix_core::model::score::AwardReason;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SimulationConfig};
use crate::stats::{DecisionSummary, MatchOutcome, RunReport, RunStats};

/// Plays the configured number of bot-vs-bot matches and writes the results.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
    agents: [AgentBlueprint; 2],
    logging_enabled: bool,
}

pub struct RunSummary {
    pub matches_played: usize,
    pub rows_written: usize,
    pub agent_names: [String; 2],
    pub wins: [usize; 2],
    pub average_rounds: f64,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub report: RunReport,
}

#[derive(Debug, Clone)]
struct AgentBlueprint {
    name: String,
    kind: PolicyKind,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = match config.agents.as_slice() {
            [a, b] => [
                AgentBlueprint {
                    name: a.name.clone(),
                    kind: a.kind.policy_kind(),
                },
                AgentBlueprint {
                    name: b.name.clone(),
                    kind: b.kind.policy_kind(),
                },
            ],
            other => return Err(RunnerError::SeatCount { found: other.len() }),
        };

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Play every match, streaming one JSONL row per match, then write the summary.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.master_seed());
        let mut stats = RunStats::new([self.agents[0].name.clone(), self.agents[1].name.clone()]);
        let mut rows_written = 0usize;
        let started = Instant::now();

        for match_index in 0..self.config.matches.count {
            let match_seed = rng.next_u64();
            let (outcome, row) = self.play_one(match_index, match_seed)?;
            stats.record(&outcome);
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }
        writer.flush()?;

        let wins = stats.wins();
        let average_rounds = stats.average_rounds();
        let report = stats.finalize(started.elapsed());
        report.write_markdown(&self.outputs.summary_md, &self.config.run_id)?;

        event!(
            Level::INFO,
            run_id = %self.config.run_id,
            matches = report.matches,
            elapsed_secs = report.elapsed_secs,
            "simulation finished"
        );

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.telemetry_jsonl());

        Ok(RunSummary {
            matches_played: report.matches,
            rows_written,
            agent_names: [self.agents[0].name.clone(), self.agents[1].name.clone()],
            wins,
            average_rounds,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
            report,
        })
    }

    /// Agent index sitting South in this match.
    fn south_agent(&self, match_index: usize) -> usize {
        if self.config.matches.alternate_seats && match_index % 2 == 1 {
            1
        } else {
            0
        }
    }

    fn play_one(
        &self,
        match_index: usize,
        match_seed: u64,
    ) -> Result<(MatchOutcome, MatchRow), RunnerError> {
        let south_agent = self.south_agent(match_index);
        let agent_at = |seat: PlayerPosition| match seat {
            PlayerPosition::South => south_agent,
            PlayerPosition::North => 1 - south_agent,
        };

        let mut timed = [
            TimedSeat::new(self.agents[0].kind.build(match_seed.wrapping_add(1))),
            TimedSeat::new(self.agents[1].kind.build(match_seed.wrapping_add(2))),
        ];
        let mut state = MatchState::with_target(match_seed, self.config.matches.target);
        let result = {
            let [first, second] = &mut timed;
            let (south, north) = if south_agent == 0 {
                (first, second)
            } else {
                (second, first)
            };
            let mut seats: Seats<'_> = [south, north];
            play_match(&mut state, &mut seats)?
        };

        let winner = agent_at(result.winner);
        let mut game_points = [0u32; 2];
        for seat in PlayerPosition::LOOP {
            game_points[agent_at(seat)] = result.game_points[seat.index()];
        }
        let reasons = result
            .awards
            .iter()
            .map(|award| (award.winner.map(agent_at), award.reason))
            .collect();
        let decisions = [timed[0].summary(), timed[1].summary()];

        if self.logging_enabled {
            event!(
                target: "sixtysix_bench::match",
                Level::INFO,
                run_id = %self.config.run_id,
                match_index = match_index as u64,
                match_seed,
                winner = %self.agents[winner].name,
                rounds = result.rounds_played,
                tie_rounds = result.tie_rounds() as u64
            );
        }

        let row = self.match_row(match_index, match_seed, south_agent, &result);
        let outcome = MatchOutcome {
            winner,
            game_points,
            rounds: result.rounds_played,
            reasons,
            decisions,
        };
        Ok((outcome, row))
    }

    fn match_row(
        &self,
        match_index: usize,
        match_seed: u64,
        south_agent: usize,
        result: &MatchResult,
    ) -> MatchRow {
        let name_at = |seat: PlayerPosition| {
            let agent = match seat {
                PlayerPosition::South => south_agent,
                PlayerPosition::North => 1 - south_agent,
            };
            self.agents[agent].name.clone()
        };
        MatchRow {
            run_id: self.config.run_id.clone(),
            match_index,
            match_seed,
            south: name_at(PlayerPosition::South),
            north: name_at(PlayerPosition::North),
            winner: name_at(result.winner),
            south_points: result.game_points[PlayerPosition::South.index()],
            north_points: result.game_points[PlayerPosition::North.index()],
            rounds: result.rounds_played,
            tie_rounds: result.tie_rounds(),
            awards: result
                .awards
                .iter()
                .map(|award| AwardRow {
                    winner: award.winner.map(name_at),
                    game_points: award.game_points,
                    reason: award.reason,
                })
                .collect(),
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Wraps a policy and accumulates the time spent choosing.
struct TimedSeat {
    policy: Box<dyn Policy>,
    total: Duration,
    decisions: u32,
}

impl TimedSeat {
    fn new(policy: Box<dyn Policy>) -> Self {
        Self {
            policy,
            total: Duration::ZERO,
            decisions: 0,
        }
    }

    fn summary(&self) -> DecisionSummary {
        DecisionSummary::from_timings(self.total, self.decisions)
    }
}

impl Policy for TimedSeat {
    fn choose(&mut self, view: &ObservableState) -> Action {
        let start = Instant::now();
        let action = self.policy.choose(view);
        self.total += start.elapsed();
        self.decisions += 1;
        action
    }

    fn notify(&mut self, event: &RoundEvent) {
        self.policy.notify(event);
    }
}

#[derive(Serialize)]
struct MatchRow {
    run_id: String,
    match_index: usize,
    match_seed: u64,
    south: String,
    north: String,
    winner: String,
    south_points: u32,
    north_points: u32,
    rounds: u32,
    tie_rounds: usize,
    awards: Vec<AwardRow>,
}

#[derive(Serialize)]
struct AwardRow {
    winner: Option<String>,
    game_points: u32,
    reason: AwardReason,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("match execution failed: {source}")]
    Match {
        #[from]
        source: MatchError,
    },
    #[error("configuration requires exactly 2 agents but found {found}")]
    SeatCount { found: usize },
}
