use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;
use stockboard_core::api::http::HttpStockApi;
use stockboard_core::api::StockApi;
use stockboard_core::config::Settings;
use stockboard_core::domain::filters::FilterPatch;
use stockboard_core::domain::pagination::PageRequest;
use stockboard_core::filters::FilterEngine;
use stockboard_core::state::analytics::OverviewStore;
use stockboard_core::state::detail::StockDetailStore;
use stockboard_core::state::recommendations::RecommendationStore;
use stockboard_core::state::stocks::StockStore;
use stockboard_core::state::system::SystemStore;
use stockboard_core::state::StoreOptions;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "stockboard")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check backend health.
    Health,
    /// Trigger a bulk sync of all stocks.
    Sync,
    /// List stocks, one page at a time.
    Stocks {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        /// Server-side action-type filter (e.g. "upgrade").
        #[arg(long)]
        action_type: Option<String>,
        /// Server-side brokerage filter (normalized value, e.g. "morgan-stanley").
        #[arg(long)]
        brokerage: Option<String>,
        /// Server-side sort order (e.g. "newest").
        #[arg(long)]
        sort_by: Option<String>,
    },
    /// Look up one stock by symbol.
    Stock {
        symbol: String,
        /// Use the search endpoint instead of the exact lookup.
        #[arg(long)]
        search: bool,
        /// Trigger a server-side refresh before reading.
        #[arg(long)]
        refresh: bool,
    },
    /// List recommendations, one page at a time.
    Recommendations {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        /// Sort the fetched page by score, best first.
        #[arg(long)]
        top: bool,
        /// Keep only high-confidence recommendations.
        #[arg(long)]
        high_confidence: bool,
    },
    /// Print the market intelligence overview.
    Overview,
    /// Print the filter option catalog.
    FilterOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "parsed cli args");

    let api: Arc<dyn StockApi> = Arc::new(HttpStockApi::from_settings(&settings)?);

    let result = run(args.command, api, &settings).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn run(command: Command, api: Arc<dyn StockApi>, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Command::Health => {
            let system = SystemStore::new(api);
            let health = system.check_health().await.context("health check failed")?;
            print_json(&json!(health))
        }
        Command::Sync => {
            let system = SystemStore::new(api);
            let outcome = system.sync_all().await.context("sync failed")?;
            print_json(&json!(outcome))
        }
        Command::Stocks {
            page,
            page_size,
            action_type,
            brokerage,
            sort_by,
        } => {
            let engine = FilterEngine::new(Arc::clone(&api));
            engine.update(FilterPatch {
                action_type,
                brokerage,
                sort_by,
            });

            let store = StockStore::for_stocks(
                api,
                StoreOptions {
                    page_size: settings.default_page_size,
                    auto_load: false,
                },
            );
            store.set_filter_params(engine.filter_params());
            store.fetch_page(PageRequest { page, page_size }).await;
            bail_on_store_error(store.error())?;

            print_json(&json!({
                "stocks": store.items(),
                "meta": store.meta(),
            }))
        }
        Command::Stock {
            symbol,
            search,
            refresh,
        } => {
            let store = StockDetailStore::new(api, &symbol);
            if refresh {
                store.refresh().await;
            } else if search {
                store.search().await;
            } else {
                store.fetch().await;
            }
            bail_on_store_error(store.error())?;

            let stock = store
                .stock()
                .with_context(|| format!("no stock loaded for {symbol}"))?;
            print_json(&json!(stock))
        }
        Command::Recommendations {
            page,
            page_size,
            top,
            high_confidence,
        } => {
            let store = RecommendationStore::for_recommendations(
                api,
                StoreOptions {
                    page_size: settings.default_page_size,
                    auto_load: false,
                },
            );
            store.fetch_page(PageRequest { page, page_size }).await;
            bail_on_store_error(store.error())?;

            let recs = if high_confidence {
                store.high_confidence()
            } else if top {
                store.top_recommendations()
            } else {
                store.items()
            };
            print_json(&json!({
                "recommendations": recs,
                "meta": store.meta(),
            }))
        }
        Command::Overview => {
            let store = OverviewStore::new(api);
            store.fetch().await;
            bail_on_store_error(store.error())?;

            let overview = store.overview().context("no overview loaded")?;
            print_json(&json!(overview))
        }
        Command::FilterOptions => {
            let engine = FilterEngine::new(api);
            engine.fetch_options().await;
            bail_on_store_error(engine.error())?;

            print_json(&json!({
                "action_types": engine.action_type_options(),
                "brokerages": engine.brokerage_options(),
                "sort_by": engine.sort_by_options(),
            }))
        }
    }
}

fn bail_on_store_error(error: Option<String>) -> anyhow::Result<()> {
    match error {
        Some(message) => anyhow::bail!(message),
        None => Ok(()),
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
