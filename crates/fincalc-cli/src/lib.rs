//! Command-line front end for FinCalc: argument parsing, configuration and output rendering.

pub mod cli;
pub mod config;

pub use cli::{Cli, Command, OutputFormat};
pub use config::FincalcConfig;
