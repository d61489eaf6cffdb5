//! Command-line argument parsing for myvax_fetcher
//!
//! This module defines the CLI structure using clap derive macros. Each feed
//! family gets a subcommand whose own subcommands name the view to compute.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{DatasetKind, View};

/// MyVax Fetcher - Malaysian vaccination feeds as JSON
#[derive(Parser, Debug)]
#[command(
    name = "myvax_fetcher",
    version,
    about = "Reshape the CITF Malaysia vaccination, registration and population feeds into JSON",
    long_about = "Fetches the CITF Malaysia public CSV feeds on demand and prints JSON views of them:
full listings, latest day-over-day deltas, per-state groupings and per-state filters."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Vaccinations administered
    Vacc(FeedArgs),

    /// Vaccination registrations
    VaccReg(FeedArgs),

    /// Population by state
    Population(PopulationArgs),

    /// List the upstream datasets
    Datasets(DatasetsArgs),

    /// List the regions and the slugs that select them
    Regions,
}

/// Arguments for a dated feed family (vaccination or registration)
#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub view: FeedView,
}

/// Views over a dated feed family
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    /// Every national row
    All,
    /// Day-over-day change of the national feed
    Latest,
    /// State rows grouped by date
    States,
    /// Every row of one state
    State {
        /// Region slug (e.g. "kuala-lumpur")
        slug: String,
    },
    /// The most recent row of every state
    StatesLatest,
    /// The most recent row of one state
    StateLatest {
        /// Region slug (e.g. "kuala-lumpur")
        slug: String,
    },
    /// The upstream CSV text
    Raw {
        /// Use the state feed instead of the national one
        #[arg(long)]
        states: bool,
    },
}

/// Arguments for the population command
#[derive(Args, Debug, Clone)]
pub struct PopulationArgs {
    #[command(subcommand)]
    pub view: PopulationView,
}

/// Views over the population table
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PopulationView {
    /// Every row
    All,
    /// The final row
    Latest,
    /// The rows of one state
    State {
        /// Region slug (e.g. "pulau-pinang")
        slug: String,
    },
    /// The upstream CSV text
    Raw,
}

/// Arguments for the datasets command
#[derive(Args, Debug, Clone)]
pub struct DatasetsArgs {
    /// Fetch every dataset and report its size and date range
    #[arg(long)]
    pub check: bool,
}

/// A fully resolved view request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub kind: DatasetKind,
    pub view: View,
    pub region: Option<String>,
}

impl ViewRequest {
    fn new(kind: DatasetKind, view: View) -> Self {
        Self {
            kind,
            view,
            region: None,
        }
    }

    fn for_region(kind: DatasetKind, view: View, slug: &str) -> Self {
        Self {
            kind,
            view,
            region: Some(slug.to_string()),
        }
    }
}

impl FeedView {
    /// Resolve the view against a feed family's national and state datasets
    pub fn request(&self, national: DatasetKind, state: DatasetKind) -> ViewRequest {
        match self {
            FeedView::All => ViewRequest::new(national, View::ListAll),
            FeedView::Latest => ViewRequest::new(national, View::Latest),
            FeedView::States => ViewRequest::new(state, View::ByRegionAll),
            FeedView::State { slug } => ViewRequest::for_region(state, View::ByRegion, slug),
            FeedView::StatesLatest => ViewRequest::new(state, View::LatestByRegionAll),
            FeedView::StateLatest { slug } => {
                ViewRequest::for_region(state, View::LatestByRegion, slug)
            }
            FeedView::Raw { states: true } => ViewRequest::new(state, View::Raw),
            FeedView::Raw { states: false } => ViewRequest::new(national, View::Raw),
        }
    }
}

impl PopulationView {
    pub fn request(&self) -> ViewRequest {
        let kind = DatasetKind::Population;
        match self {
            PopulationView::All => ViewRequest::new(kind, View::ListAll),
            PopulationView::Latest => ViewRequest::new(kind, View::Latest),
            PopulationView::State { slug } => ViewRequest::for_region(kind, View::ByRegion, slug),
            PopulationView::Raw => ViewRequest::new(kind, View::Raw),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// `default` applies when no verbosity flag is given.
    pub fn log_level(&self, default: tracing::Level) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("myvax_fetcher").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_feed_view_parsing() {
        let cli = parse(&["vacc", "state-latest", "kuala-lumpur"]);
        let Commands::Vacc(args) = cli.command else {
            panic!("Expected vacc command");
        };
        assert_eq!(
            args.view,
            FeedView::StateLatest {
                slug: "kuala-lumpur".to_string()
            }
        );

        let cli = parse(&["vacc-reg", "raw", "--states"]);
        let Commands::VaccReg(args) = cli.command else {
            panic!("Expected vacc-reg command");
        };
        assert_eq!(args.view, FeedView::Raw { states: true });
    }

    #[test]
    fn test_feed_view_requests() {
        let national = DatasetKind::NationalRegistration;
        let state = DatasetKind::StateRegistration;

        assert_eq!(
            FeedView::Latest.request(national, state),
            ViewRequest::new(national, View::Latest)
        );
        assert_eq!(
            FeedView::States.request(national, state),
            ViewRequest::new(state, View::ByRegionAll)
        );
        assert_eq!(
            FeedView::State {
                slug: "johor".to_string()
            }
            .request(national, state),
            ViewRequest::for_region(state, View::ByRegion, "johor")
        );
        assert_eq!(
            FeedView::Raw { states: false }.request(national, state).kind,
            national
        );
    }

    #[test]
    fn test_population_requests() {
        let request = PopulationView::State {
            slug: "pulau-pinang".to_string(),
        }
        .request();
        assert_eq!(request.kind, DatasetKind::Population);
        assert_eq!(request.view, View::ByRegion);
        assert_eq!(request.region.as_deref(), Some("pulau-pinang"));

        // population has no grouped view to ask for
        assert!(Cli::try_parse_from(["myvax_fetcher", "population", "states"]).is_err());
    }

    #[test]
    fn test_state_view_requires_slug() {
        assert!(Cli::try_parse_from(["myvax_fetcher", "vacc", "state"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["datasets", "--check", "--compact", "-q"]);
        assert!(cli.global.compact);
        assert!(cli.global.quiet);
        let Commands::Datasets(args) = cli.command else {
            panic!("Expected datasets command");
        };
        assert!(args.check);
    }

    #[test]
    fn test_log_level() {
        let quiet = parse(&["-q", "regions"]);
        assert_eq!(quiet.log_level(tracing::Level::WARN), tracing::Level::ERROR);

        let verbose = parse(&["-v", "regions"]);
        assert_eq!(verbose.log_level(tracing::Level::WARN), tracing::Level::INFO);

        let very_verbose = parse(&["--very-verbose", "regions"]);
        assert_eq!(
            very_verbose.log_level(tracing::Level::WARN),
            tracing::Level::DEBUG
        );

        let default = parse(&["regions"]);
        assert_eq!(default.log_level(tracing::Level::WARN), tracing::Level::WARN);
        assert_eq!(default.log_level(tracing::Level::INFO), tracing::Level::INFO);
    }
}
