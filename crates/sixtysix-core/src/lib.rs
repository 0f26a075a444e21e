#![deny(warnings)]
//! Rules engine for two-player Sixty-Six: cards, rounds, matches and the
//! observation/action boundary that decision-makers plug into.

pub mod game;
pub mod model;
