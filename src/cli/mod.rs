//! Command-line interface components
//!
//! This module contains CLI-specific code for myvax_fetcher: argument
//! parsing, command handlers and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{
    Cli, Commands, DatasetsArgs, FeedArgs, FeedView, GlobalArgs, PopulationArgs, PopulationView,
    ViewRequest,
};
pub use commands::{
    handle_datasets, handle_population, handle_regions, handle_vacc, handle_vacc_reg,
    CommandContext, OutputOptions,
};
pub use progress::FetchSpinner;
