//! Per-agent aggregation across a simulation run and the Markdown report.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use sixtysix_core::model::score::AwardReason;

/// Everything the report needs from one match, indexed by agent (config order), not seat.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub winner: usize,
    pub game_points: [u32; 2],
    pub rounds: u32,
    pub reasons: Vec<(Option<usize>, AwardReason)>,
    pub decisions: [DecisionSummary; 2],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub total_ms: f64,
}

impl DecisionSummary {
    pub fn from_timings(total: Duration, decisions: u32) -> Self {
        Self {
            decisions,
            total_ms: total.as_secs_f64() * 1000.0,
        }
    }

    pub fn avg_ms(&self) -> f64 {
        if self.decisions == 0 {
            0.0
        } else {
            self.total_ms / f64::from(self.decisions)
        }
    }
}

#[derive(Debug, Clone, Default)]
struct AgentTally {
    wins: usize,
    game_points: u64,
    rounds_won: usize,
    closed_won: usize,
    closed_lost: usize,
    schneiders: usize,
    decisions: u32,
    decision_ms: f64,
}

/// Running totals for both agents.
#[derive(Debug, Clone)]
pub struct RunStats {
    names: [String; 2],
    matches: usize,
    rounds: u64,
    tie_rounds: usize,
    agents: [AgentTally; 2],
}

impl RunStats {
    pub fn new(names: [String; 2]) -> Self {
        Self {
            names,
            matches: 0,
            rounds: 0,
            tie_rounds: 0,
            agents: Default::default(),
        }
    }

    pub fn record(&mut self, outcome: &MatchOutcome) {
        self.matches += 1;
        self.rounds += u64::from(outcome.rounds);
        self.agents[outcome.winner].wins += 1;

        for (idx, tally) in self.agents.iter_mut().enumerate() {
            tally.game_points += u64::from(outcome.game_points[idx]);
            tally.decisions += outcome.decisions[idx].decisions;
            tally.decision_ms += outcome.decisions[idx].total_ms;
        }

        for (winner, reason) in &outcome.reasons {
            let Some(winner) = *winner else {
                self.tie_rounds += 1;
                continue;
            };
            let tally = &mut self.agents[winner];
            tally.rounds_won += 1;
            match reason {
                AwardReason::ClosedByWinner => tally.closed_won += 1,
                AwardReason::ClosedAndFailed => self.agents[1 - winner].closed_lost += 1,
                AwardReason::Schneider => tally.schneiders += 1,
                AwardReason::Standard | AwardReason::Tie => {}
            }
        }
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn wins(&self) -> [usize; 2] {
        [self.agents[0].wins, self.agents[1].wins]
    }

    pub fn average_rounds(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.rounds as f64 / self.matches as f64
        }
    }

    pub fn finalize(self, elapsed: Duration) -> RunReport {
        let matches = self.matches;
        let agents = self
            .names
            .iter()
            .zip(self.agents.iter())
            .map(|(name, tally)| AgentReport {
                name: name.clone(),
                wins: tally.wins,
                win_rate: rate(tally.wins, matches),
                avg_game_points: if matches == 0 {
                    0.0
                } else {
                    tally.game_points as f64 / matches as f64
                },
                rounds_won: tally.rounds_won,
                closed_won: tally.closed_won,
                closed_lost: tally.closed_lost,
                schneiders: tally.schneiders,
                avg_ms_per_decision: DecisionSummary {
                    decisions: tally.decisions,
                    total_ms: tally.decision_ms,
                }
                .avg_ms(),
            })
            .collect();
        let secs = elapsed.as_secs_f64();
        RunReport {
            matches,
            average_rounds: self.average_rounds(),
            tie_rounds: self.tie_rounds,
            elapsed_secs: secs,
            matches_per_sec: if secs > 0.0 { matches as f64 / secs } else { 0.0 },
            agents,
        }
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub wins: usize,
    pub win_rate: f64,
    pub avg_game_points: f64,
    pub rounds_won: usize,
    pub closed_won: usize,
    pub closed_lost: usize,
    pub schneiders: usize,
    pub avg_ms_per_decision: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub matches: usize,
    pub average_rounds: f64,
    pub tie_rounds: usize,
    pub elapsed_secs: f64,
    pub matches_per_sec: f64,
    pub agents: Vec<AgentReport>,
}

impl RunReport {
    pub fn to_markdown(&self, run_id: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Simulation Summary: {run_id}\n");
        let _ = writeln!(
            out,
            "Matches: {}  |  Avg rounds/match: {:.2}  |  Tied rounds: {}\n",
            self.matches, self.average_rounds, self.tie_rounds
        );
        out.push_str("| Agent | Wins | Win % | Avg game pts | Rounds won | Closed won | Closed lost | Schneider | Avg ms/decision |\n");
        out.push_str("|-------|------|-------|--------------|------------|------------|-------------|-----------|-----------------|\n");
        for agent in &self.agents {
            let _ = writeln!(
                out,
                "| {} | {} | {:.1}% | {:.2} | {} | {} | {} | {} | {:.4} |",
                agent.name,
                agent.wins,
                agent.win_rate * 100.0,
                agent.avg_game_points,
                agent.rounds_won,
                agent.closed_won,
                agent.closed_lost,
                agent.schneiders,
                agent.avg_ms_per_decision
            );
        }
        let _ = writeln!(
            out,
            "\nElapsed: {:.3}s ({:.1} matches/sec)",
            self.elapsed_secs, self.matches_per_sec
        );
        out
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>, run_id: &str) -> std::io::Result<()> {
        fs::write(path, self.to_markdown(run_id))
    }
}
