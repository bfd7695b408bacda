pub mod command;
pub mod config;
pub mod error;
pub mod intent;
pub mod io;
pub mod orchestrator;
pub mod paths;
pub mod reference;
pub mod registry;
pub mod rules;
pub mod specialist;
pub mod types;

pub use error::{ConductorError, Result};
