//! Computer opponent.

mod config;
mod simple;

pub use config::{AiConfig, Difficulty};
pub use simple::SimpleAi;
