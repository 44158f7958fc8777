pub mod logger;
pub mod pacing;
pub mod term;

pub use term::{render, TermContext};
