pub mod config;
pub mod error;
pub mod events;
pub mod mappings;
pub mod resolver;
pub mod rules;
pub mod services;
pub mod utils;

pub use config::{Config, MatchBy};
pub use error::{RedirectorError, Result};
pub use resolver::{resolve, resolve_low_level, should_capture, FocusQuery};
pub use rules::{RuleSet, RuleStore};
