mod config;
mod sequencer;

pub use self::config::{ChainConfig, SpacingRule};
pub use self::sequencer::ChainSequencer;
