use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use catalog_core::{
    DataLoader, Endpoints, FileProductSource, HttpLogSink, HttpProductSource, InteractionController,
    InteractionState, LatencySimulator, Logger, ProductSource, SimulatedBackend,
};
use clap::Parser;
use shared::protocol::{FilterModel, SortDirection, SortModel};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(about = "Browse the product catalog with simulated filter/sort latency")]
struct Args {
    /// Settings file; `catalog.toml` in the working directory is used when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Origin serving `/products.json` and `/api/logs`.
    #[arg(long)]
    base_url: Option<String>,
    /// Read the product list from a local JSON file instead of the endpoint.
    #[arg(long, conflicts_with = "base_url")]
    products_file: Option<PathBuf>,
    /// Category to filter by, applied in order; an empty value clears the filter.
    #[arg(long = "filter")]
    filters: Vec<String>,
    /// Sort as FIELD or FIELD:asc|desc, applied after all filters.
    #[arg(long = "sort", value_parser = parse_sort)]
    sorts: Vec<SortModel>,
    #[arg(long)]
    min_delay_ms: Option<u64>,
    #[arg(long)]
    max_delay_ms: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
    /// Keep log records on the console only.
    #[arg(long)]
    no_forward_logs: bool,
    #[arg(long, default_value_t = 10)]
    page_size: usize,
}

impl Args {
    fn merge_into(&self, mut settings: Settings) -> Settings {
        if let Some(v) = &self.base_url {
            settings.base_url = v.clone();
            settings.products_file = None;
        }
        if let Some(v) = &self.products_file {
            settings.products_file = Some(v.clone());
        }
        if let Some(v) = self.min_delay_ms {
            settings.min_delay_ms = v;
        }
        if let Some(v) = self.max_delay_ms {
            settings.max_delay_ms = v;
        }
        if let Some(v) = self.seed {
            settings.rng_seed = Some(v);
        }
        if self.no_forward_logs {
            settings.forward_logs = false;
        }
        settings
    }
}

fn parse_sort(raw: &str) -> Result<SortModel, String> {
    let (field, direction) = raw.split_once(':').unwrap_or((raw, "asc"));
    let direction = match direction.to_ascii_lowercase().as_str() {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        other => return Err(format!("unknown sort direction '{other}' (expected asc or desc)")),
    };
    if field.trim().is_empty() {
        return Err("sort field must not be empty".into());
    }
    Ok(SortModel::by(field.trim(), direction))
}

fn build_controller(settings: &Settings) -> Result<InteractionController> {
    let endpoints = Endpoints::from_base(&settings.base_url)?;

    let logger = if settings.forward_logs {
        Logger::new(Arc::new(HttpLogSink::new(endpoints.logs.clone())))
    } else {
        Logger::console_only()
    };

    let source: Arc<dyn ProductSource> = match &settings.products_file {
        Some(path) => Arc::new(FileProductSource::new(path)),
        None => Arc::new(HttpProductSource::new(endpoints.products.clone())),
    };

    let mut latency = LatencySimulator::with_bounds(
        settings.min_delay_ms,
        settings.max_delay_ms,
        logger.clone(),
    );
    if let Some(seed) = settings.rng_seed {
        latency = latency.seeded(seed);
    }

    Ok(InteractionController::new(
        DataLoader::new(source, logger.clone()),
        Arc::new(SimulatedBackend::new(latency)),
        logger,
    ))
}

/// Prints a line whenever the loading overlay would appear or disappear.
fn spawn_loading_indicator(mut states: watch::Receiver<InteractionState>) {
    tokio::spawn(async move {
        let mut was_loading = false;
        while states.changed().await.is_ok() {
            let loading = states.borrow_and_update().is_loading;
            if loading && !was_loading {
                println!("... loading");
            }
            was_loading = loading;
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = args.merge_into(
        load_settings(args.config.as_deref()).context("failed to load catalog settings")?,
    );
    tracing::debug!(?settings, "settings resolved");

    let controller = build_controller(&settings)?;
    spawn_loading_indicator(controller.subscribe());

    controller.initialize().await;
    print!(
        "{}",
        render::render_table(&controller.snapshot(), controller.logger(), args.page_size)
    );

    for term in &args.filters {
        match controller.filter_changed(FilterModel::category(term.as_str())) {
            Some(operation) => operation.settled().await,
            None => {
                println!("(filter unchanged)");
                continue;
            }
        }
        print!(
            "{}",
            render::render_table(&controller.snapshot(), controller.logger(), args.page_size)
        );
    }

    for sort in &args.sorts {
        controller.apply_sort(sort.clone()).await;
        print!(
            "{}",
            render::render_table(&controller.snapshot(), controller.logger(), args.page_size)
        );
    }

    Ok(())
}
