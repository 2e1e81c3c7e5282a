//! Terminal snake arcade game with synthesized audio cues.

pub mod game;
pub mod state;
pub mod term;
pub mod tone;

pub type GameInt = i32;
pub type Coords = (GameInt, GameInt);

pub type TermInt = u16;
pub type TermCoords = (TermInt, TermInt);
