use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use survey_insights::adapters::{cache, SurveyMonkeyClient, SurveyMonkeyConfig, SystemClock};
use survey_insights::application::{
    AggregatedSurveyData, CacheManager, GetAggregatedSurveyDataHandler,
    GetAggregatedSurveyDataQuery, ListSurveysHandler, ListSurveysQuery, RefreshSurveyDataCommand,
    RefreshSurveyDataHandler,
};
use survey_insights::config::{AppConfig, LoggingConfig};
use survey_insights::domain::aggregation::{SummaryStats, TimeRange, TrendPoint};
use survey_insights::domain::foundation::SurveyId;
use survey_insights::ports::{Clock, SurveyApi, SurveyListQuery};

#[derive(Parser)]
#[command(name = "survey-insights", version, about = "Survey response aggregation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a survey's responses and print them as JSON
    Aggregate {
        #[arg(long)]
        survey_id: String,
        /// Minimum total answers a question needs to be shown
        #[arg(long, default_value_t = 0)]
        threshold: u32,
        /// Recency window: 1d, 7d, 30d or 1y; anything else disables filtering
        #[arg(long, default_value = "7d")]
        time_range: String,
        /// Drop cached results for the survey before loading
        #[arg(long)]
        refresh: bool,
        /// Include headline statistics
        #[arg(long)]
        summary: bool,
        /// Include response counts over time
        #[arg(long)]
        trend: bool,
    },
    /// List the account's surveys and print one page as JSON
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = SurveyListQuery::DEFAULT_PER_PAGE)]
        per_page: u32,
        /// Case-insensitive title search within the page
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Serialize)]
struct AggregateOutput {
    #[serde(flatten)]
    data: AggregatedSurveyData,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<SummaryStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trend: Option<Vec<TrendPoint>>,
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.log_level))
        .context("invalid log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.use_json() {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    init_tracing(&config.logging)?;

    let client: Arc<dyn SurveyApi> = Arc::new(SurveyMonkeyClient::new(
        SurveyMonkeyConfig::from_secret(config.survey_api.access_token.clone())
            .with_base_url(config.survey_api.base_url.clone())
            .with_timeout(config.survey_api.timeout()),
    )?);

    match cli.command {
        Commands::Aggregate {
            survey_id,
            threshold,
            time_range,
            refresh,
            summary,
            trend,
        } => {
            let clock: Arc<dyn Clock> = Arc::new(SystemClock);
            let store = cache::connect(&config.cache).await?;
            let cache_manager =
                Arc::new(CacheManager::new(store, clock.clone()).with_ttl(config.cache.ttl()));
            let loader = Arc::new(
                GetAggregatedSurveyDataHandler::new(client, cache_manager.clone(), clock)
                    .with_per_page(config.survey_api.per_page),
            );

            let survey_id = SurveyId::new(survey_id)?;
            let time_range = TimeRange::parse(&time_range);

            let data = if refresh {
                RefreshSurveyDataHandler::new(cache_manager, loader)
                    .handle(RefreshSurveyDataCommand {
                        survey_id,
                        threshold,
                        time_range: time_range.clone(),
                    })
                    .await?
            } else {
                loader
                    .handle(&GetAggregatedSurveyDataQuery::new(
                        survey_id,
                        threshold,
                        time_range.clone(),
                    ))
                    .await?
            };

            let output = AggregateOutput {
                summary: summary.then(|| data.summary()),
                trend: trend.then(|| data.trend(&time_range)),
                data,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::List {
            page,
            per_page,
            query,
        } => {
            let mut list_query = ListSurveysQuery::new(page, per_page);
            if let Some(title) = query {
                list_query = list_query.with_title_query(title);
            }

            let surveys = ListSurveysHandler::new(client).handle(&list_query).await?;
            println!("{}", serde_json::to_string_pretty(&surveys)?);
        }
    }

    Ok(())
}
