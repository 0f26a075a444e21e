use crate::render::{SeatNames, card_label, describe_event, play_hint, render_state, welcome};
use sixtysix_core::game::policy::Policy;
use sixtysix_core::model::action::Action;
use sixtysix_core::model::card::Card;
use sixtysix_core::model::event::RoundEvent;
use sixtysix_core::model::observation::ObservableState;
use sixtysix_core::model::player::PlayerPosition;
use sixtysix_core::model::rank::Rank;
use sixtysix_core::model::score::marriage_value;
use sixtysix_core::model::suit::Suit;
use std::fmt;
use std::io::{self, BufRead, Write};
use tracing::{Level, event};

/// Why a typed card choice was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    NotANumber,
    OutOfRange { max: usize },
    NotPlayable(Card),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::NotANumber => write!(f, "Please enter a number!"),
            InputError::OutOfRange { max } => {
                write!(f, "Invalid card number! Choose between 1 and {max}.")
            }
            InputError::NotPlayable(card) => {
                write!(f, "{} cannot be played right now.", card_label(*card))
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Resolves a typed 1-based card number into the plain play it names.
pub fn parse_card_choice(raw: &str, view: &ObservableState) -> Result<Action, InputError> {
    let number: usize = raw.trim().parse().map_err(|_| InputError::NotANumber)?;
    if number == 0 || number > view.hand.len() {
        return Err(InputError::OutOfRange {
            max: view.hand.len(),
        });
    }
    let action = Action::play(number - 1);
    if view.is_valid(&action) {
        Ok(action)
    } else {
        Err(InputError::NotPlayable(view.hand[number - 1]))
    }
}

/// A human at the keyboard. Reads choices from `input`, writes the table to
/// `output`, and re-prompts on anything that does not name an offered action.
///
/// When `input` runs dry or `output` fails the policy hangs up: it keeps the
/// round moving with the first offered action and reports `hung_up()`.
pub struct TerminalPolicy<R, W> {
    input: R,
    output: W,
    seat: PlayerPosition,
    names: SeatNames,
    match_points: [u32; 2],
    hung_up: bool,
}

impl<R: BufRead, W: Write> TerminalPolicy<R, W> {
    pub fn new(input: R, output: W, seat: PlayerPosition, opponent: &str) -> Self {
        Self {
            input,
            output,
            seat,
            names: SeatNames::human(seat, opponent),
            match_points: [0, 0],
            hung_up: false,
        }
    }

    pub fn names(&self) -> &SeatNames {
        &self.names
    }

    pub fn hung_up(&self) -> bool {
        self.hung_up
    }

    /// Match totals shown in the header, South first.
    pub fn set_match_points(&mut self, points: [u32; 2]) {
        self.match_points = points;
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) {
        if self.hung_up {
            return;
        }
        if let Err(err) = writeln!(self.output, "{text}").and_then(|_| self.output.flush()) {
            event!(Level::WARN, error = %err, "terminal output failed");
            self.hung_up = true;
        }
    }

    /// Shows `prompt` and returns the trimmed reply, or `None` once input is gone.
    pub fn ask(&mut self, prompt: &str) -> Option<String> {
        if self.hung_up {
            return None;
        }
        if let Err(err) = write!(self.output, "{prompt}").and_then(|_| self.output.flush()) {
            event!(Level::WARN, error = %err, "terminal output failed");
            self.hung_up = true;
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => {
                event!(Level::DEBUG, "terminal input closed");
                self.hung_up = true;
                None
            }
            Ok(_) => Some(line.trim().to_string()),
            Err(err) => {
                event!(Level::WARN, error = %err, "terminal input failed");
                self.hung_up = true;
                None
            }
        }
    }

    pub fn show_welcome(&mut self) {
        self.say(&welcome());
        let _ = self.ask("\nPress Enter to start the match...");
    }

    /// `true` for a `y`/`yes` reply.
    pub fn confirm(&mut self, prompt: &str) -> bool {
        self.ask(prompt)
            .is_some_and(|reply| matches!(reply.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn choose_privilege(&mut self, view: &ObservableState) -> Option<Action> {
        let can_swap = view.can_swap();
        loop {
            self.say("Winner actions (Phase 1):");
            if can_swap {
                let nine = Card::new(Rank::Nine, view.trump_suit);
                if let Some(trump) = view.trump_card {
                    self.say(&format!(
                        "  [S] Swap {} with trump {}",
                        card_label(nine),
                        card_label(trump)
                    ));
                }
            }
            self.say("  [C] Close the game (enter Phase 2)");
            self.say("  [Enter] Continue to play");

            let reply = self.ask("\nYour choice: ")?;
            match reply.to_ascii_lowercase().as_str() {
                "s" if can_swap => return Some(Action::SwapTrump),
                "c" => return Some(Action::CloseGame),
                "" => return Some(Action::Pass),
                _ => self.say("Choose S, C or press Enter."),
            }
        }
    }

    fn choose_card(&mut self, view: &ObservableState) -> Option<Action> {
        let marriages = view.marriage_suits();
        let mut prompt = format!("\nPlay card [1-{}]", view.hand.len());
        if !marriages.is_empty() {
            prompt.push_str(" or [M] to announce a marriage");
        }
        prompt.push_str(": ");

        loop {
            self.say(&play_hint(view));
            let reply = self.ask(&prompt)?;
            if reply.eq_ignore_ascii_case("m") && !marriages.is_empty() {
                match self.choose_marriage(view, &marriages)? {
                    Some(action) => return Some(action),
                    None => continue,
                }
            }
            match parse_card_choice(&reply, view) {
                Ok(action) => return Some(action),
                Err(err) => {
                    event!(Level::DEBUG, input = %reply, error = %err, "re-prompting");
                    self.say(&format!("! {err}"));
                }
            }
        }
    }

    /// Outer `None` means input is gone; inner `None` means the player cancelled.
    fn choose_marriage(
        &mut self,
        view: &ObservableState,
        marriages: &[Suit],
    ) -> Option<Option<Action>> {
        let suit = loop {
            self.say("Announce marriage:");
            for (idx, suit) in marriages.iter().enumerate() {
                self.say(&format!(
                    "  [{}] {} marriage (+{} points)",
                    idx + 1,
                    suit.symbol(),
                    marriage_value(*suit, view.trump_suit)
                ));
            }
            self.say("  [0] Cancel");
            let reply = self.ask("\nChoose marriage: ")?;
            match reply.parse::<usize>() {
                Ok(0) => return Some(None),
                Ok(n) if n <= marriages.len() => break marriages[n - 1],
                _ => self.say(&format!("! Enter 0-{}.", marriages.len())),
            }
        };

        let king = Card::new(Rank::King, suit);
        let queen = Card::new(Rank::Queen, suit);
        let offers: Vec<(Card, Action)> = [king, queen]
            .into_iter()
            .filter_map(|card| {
                let index = view.hand.iter().position(|held| *held == card)?;
                let action = Action::play_with_marriage(index, suit);
                view.is_valid(&action).then_some((card, action))
            })
            .collect();
        debug_assert_eq!(offers.len(), 2, "marriage offered without both cards");

        loop {
            self.say(&format!("{} marriage! Play which card?", suit.symbol()));
            for (idx, (card, _)) in offers.iter().enumerate() {
                self.say(&format!("  [{}] {}", idx + 1, card_label(*card)));
            }
            let reply = self.ask("\nYour choice: ")?;
            match reply.parse::<usize>() {
                Ok(n) if (1..=offers.len()).contains(&n) => return Some(Some(offers[n - 1].1)),
                _ => self.say("! Enter 1 for the King or 2 for the Queen."),
            }
        }
    }

    /// Never swaps or closes on the player's behalf.
    fn fallback(view: &ObservableState) -> Action {
        if view.is_winner_privilege {
            return Action::Pass;
        }
        view.valid_actions.first().copied().unwrap_or(Action::Pass)
    }
}

impl<R: BufRead, W: Write> Policy for TerminalPolicy<R, W> {
    fn choose(&mut self, view: &ObservableState) -> Action {
        let screen = render_state(view, &self.names, self.match_points);
        self.say(&screen);

        let chosen = if view.is_winner_privilege {
            self.choose_privilege(view)
        } else {
            self.choose_card(view)
        };
        chosen.unwrap_or_else(|| Self::fallback(view))
    }

    fn notify(&mut self, round_event: &RoundEvent) {
        // The human's own plays are already on screen.
        if let RoundEvent::CardPlayed { seat, .. } = round_event {
            if *seat == self.seat {
                return;
            }
        }
        if let Some(line) = describe_event(round_event, &self.names) {
            self.say(&line);
        }
    }
}

/// Wraps a bot and writes a transcript line for every public event.
pub struct Narrator<P, W> {
    inner: P,
    output: W,
    names: SeatNames,
}

impl<P, W: Write> Narrator<P, W> {
    pub fn new(inner: P, output: W, names: SeatNames) -> Self {
        Self {
            inner,
            output,
            names,
        }
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<P: Policy, W: Write> Policy for Narrator<P, W> {
    fn choose(&mut self, view: &ObservableState) -> Action {
        self.inner.choose(view)
    }

    fn notify(&mut self, round_event: &RoundEvent) {
        self.inner.notify(round_event);
        if let Some(line) = describe_event(round_event, &self.names) {
            if let Err(err) = writeln!(self.output, "{line}") {
                event!(Level::WARN, error = %err, "transcript write failed");
            }
        }
    }
}
