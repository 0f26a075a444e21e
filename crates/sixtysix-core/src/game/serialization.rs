use super::match_state::{MATCH_TARGET, MatchState};
use crate::model::player::PlayerPosition;
use serde::{Deserialize, Serialize};

/// Between-rounds checkpoint of a match. The next deal is recomputed from the seed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub seed: u64,
    pub round_number: u32,
    pub game_points: [u32; 2],
    pub next_leader: PlayerPosition,
    #[serde(default = "default_target")]
    pub target: u32,
}

fn default_target() -> u32 {
    MATCH_TARGET
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        MatchSnapshot {
            seed: state.seed(),
            round_number: state.round_number(),
            game_points: *state.game_points().standings(),
            next_leader: state.round().starting_player(),
            target: state.target(),
        }
    }

    pub fn restore(self) -> MatchState {
        let mut state =
            MatchState::resume(self.seed, self.round_number, self.next_leader, self.target);
        state.set_game_points(self.game_points);
        state
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::MatchSnapshot;
    use crate::game::match_state::MatchState;
    use crate::model::player::PlayerPosition;

    #[test]
    fn snapshot_serializes_to_json() {
        let state = MatchState::with_seed(99);
        let json = MatchSnapshot::to_json(&state).unwrap();
        assert!(json.contains("\"seed\": 99"));
        assert!(json.contains("\"round_number\": 1"));
        assert!(json.contains("\"target\": 7"));
    }

    #[test]
    fn restore_reproduces_the_current_deal() {
        let mut state = MatchState::with_target(123, 11);
        state.set_game_points([4, 2]);
        let snapshot = MatchSnapshot::capture(&state);
        let restored = snapshot.clone().restore();

        assert_eq!(restored.seed(), 123);
        assert_eq!(restored.target(), 11);
        assert_eq!(restored.game_points().standings(), &snapshot.game_points);
        assert_eq!(
            restored.round().starting_player(),
            state.round().starting_player()
        );
        for seat in PlayerPosition::LOOP {
            assert_eq!(restored.round().hand(seat), state.round().hand(seat));
        }
        assert!(!restored.is_over());
    }

    #[test]
    fn missing_target_falls_back_to_seven() {
        let json = r#"{
            "seed": 7,
            "round_number": 3,
            "game_points": [5, 6],
            "next_leader": "North"
        }"#;

        let snapshot = MatchSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.target, 7);
        let state = snapshot.restore();
        assert_eq!(state.round_number(), 3);
        assert_eq!(state.round().starting_player(), PlayerPosition::North);
    }

    #[test]
    fn restored_totals_past_target_close_the_match() {
        let snapshot = MatchSnapshot {
            seed: 1,
            round_number: 5,
            game_points: [8, 1],
            next_leader: PlayerPosition::South,
            target: 7,
        };
        let state = snapshot.restore();
        assert_eq!(state.winner(), Some(PlayerPosition::South));
    }
}
