pub mod action;
pub mod card;
pub mod deck;
pub mod event;
pub mod hand;
pub mod observation;
pub mod phase;
pub mod player;
pub mod rank;
pub mod round;
pub mod score;
pub mod suit;
pub mod trick;
