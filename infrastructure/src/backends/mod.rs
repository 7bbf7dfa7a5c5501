//! Local CLI backends: detection, subprocess execution, output parsing

pub mod capabilities;
pub mod cli_runner;
pub mod cli_tools;

pub use capabilities::{CliCapabilities, CliTool};
