//! Command handlers for myvax_fetcher CLI
//!
//! This module implements the command handlers that turn parsed arguments
//! into service calls and print the results. Handlers are generic over the
//! [`TextSource`] so they run the same against HTTP or in-memory text.

use std::io::{self, Write};

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::app::{
    CanonicalRegion, DatasetKind, FeedCatalog, FeedService, FeedSummary, TextSource, ViewOutput,
};
use crate::cli::args::{DatasetsArgs, FeedArgs, PopulationArgs, ViewRequest};
use crate::cli::progress::FetchSpinner;
use crate::errors::{AppError, Result};

/// How command output is printed
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Single-line JSON instead of pretty-printed
    pub compact: bool,
    /// Show a spinner while fetching
    pub progress: bool,
}

/// Everything a command handler needs
#[derive(Debug)]
pub struct CommandContext<S> {
    service: FeedService<S>,
    output: OutputOptions,
}

impl<S: TextSource> CommandContext<S> {
    pub fn new(service: FeedService<S>, output: OutputOptions) -> Self {
        Self { service, output }
    }

    pub fn service(&self) -> &FeedService<S> {
        &self.service
    }

    pub fn output(&self) -> OutputOptions {
        self.output
    }
}

/// Handle the vacc command
pub async fn handle_vacc<S: TextSource>(ctx: &CommandContext<S>, args: FeedArgs) -> Result<()> {
    let request = args.view.request(
        DatasetKind::NationalVaccination,
        DatasetKind::StateVaccination,
    );
    run_view(ctx, request).await
}

/// Handle the vacc-reg command
pub async fn handle_vacc_reg<S: TextSource>(
    ctx: &CommandContext<S>,
    args: FeedArgs,
) -> Result<()> {
    let request = args.view.request(
        DatasetKind::NationalRegistration,
        DatasetKind::StateRegistration,
    );
    run_view(ctx, request).await
}

/// Handle the population command
pub async fn handle_population<S: TextSource>(
    ctx: &CommandContext<S>,
    args: PopulationArgs,
) -> Result<()> {
    run_view(ctx, args.view.request()).await
}

/// Handle the datasets command
///
/// Without `--check` this only lists the catalog. With it, every dataset is
/// fetched concurrently and summarized; the command fails if any fetch did.
pub async fn handle_datasets<S: TextSource>(
    ctx: &CommandContext<S>,
    args: DatasetsArgs,
) -> Result<()> {
    if !args.check {
        return write_catalog(&mut io::stdout().lock(), ctx.service.catalog());
    }

    info!("Checking {} datasets", DatasetKind::ALL.len());
    let spinner = FetchSpinner::start("Fetching all datasets...", ctx.output.progress);
    let results = join_all(
        DatasetKind::ALL
            .iter()
            .map(|&kind| ctx.service.summarize(kind)),
    )
    .await;
    spinner.finish();

    let mut summaries: Vec<FeedSummary> = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (kind, result) in DatasetKind::ALL.iter().zip(results) {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                failed += 1;
                warn!("Check of the {} dataset failed ({}): {}", kind, e.category(), e);
                eprintln!("❌ {}: {}", kind, e);
            }
        }
    }

    write_json(&mut io::stdout().lock(), &summaries, ctx.output.compact)?;

    if failed > 0 {
        return Err(AppError::generic(format!(
            "{} of {} datasets failed the check",
            failed,
            DatasetKind::ALL.len()
        )));
    }
    Ok(())
}

/// Handle the regions command
pub fn handle_regions() -> Result<()> {
    write_regions(&mut io::stdout().lock())
}

async fn run_view<S: TextSource>(ctx: &CommandContext<S>, request: ViewRequest) -> Result<()> {
    info!(
        "Requesting '{}' view of the {} dataset",
        request.view, request.kind
    );

    let spinner = FetchSpinner::start(
        format!("Fetching {} dataset...", request.kind),
        ctx.output.progress,
    );
    let result = ctx
        .service
        .run(request.kind, request.view, request.region.as_deref())
        .await;
    spinner.finish();

    write_view(&mut io::stdout().lock(), &result?, ctx.output.compact)
}

/// Print a view result
///
/// Raw views print the upstream text as is; everything else prints JSON.
pub fn write_view(out: &mut impl Write, output: &ViewOutput, compact: bool) -> Result<()> {
    match output {
        ViewOutput::Raw(raw) => {
            out.write_all(raw.data.as_bytes())?;
            if !raw.data.ends_with('\n') {
                writeln!(out)?;
            }
            Ok(())
        }
        other => write_json(out, other, compact),
    }
}

fn write_json(out: &mut impl Write, value: &impl Serialize, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print every dataset with its URL and supported views
pub fn write_catalog(out: &mut impl Write, catalog: &FeedCatalog) -> Result<()> {
    for kind in DatasetKind::ALL {
        let url = catalog.url_for(kind)?;
        let views = kind
            .views()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        writeln!(out, "{}", kind.config_key())?;
        writeln!(out, "  url:   {}", url)?;
        writeln!(out, "  views: {}", views)?;
    }
    Ok(())
}

/// Print every region slug next to the label it selects
pub fn write_regions(out: &mut impl Write) -> Result<()> {
    for region in CanonicalRegion::ALL {
        writeln!(out, "{:<16} {}", region.slug(), region.label())?;
    }
    Ok(())
}
