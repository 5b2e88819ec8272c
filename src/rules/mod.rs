//! Rule engine for moves and burns.
//!
//! `MoveValidator` decides legality against a board snapshot. The turn
//! engine and the AI both go through it, so an automated seat can never
//! play by different rules than a human.

pub mod validator;

pub use validator::MoveValidator;
