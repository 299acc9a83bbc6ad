//! Index documents into a local cluster from many virtual users, then print the report.
//!
//! Configure with `SEARCHLOAD_ADDRESS`, `SEARCHLOAD_USERNAME`, `SEARCHLOAD_PASSWORD`,
//! `SEARCHLOAD_INSECURE=1` for self-signed clusters, `SEARCHLOAD_SEED` to replay runs.
use std::sync::Arc;
use std::time::Duration;

use searchload::{
    ConnectionConfig, ConstantVus, OpenSearch, RandomSource, Reporter, Scenario,
    StatisticsAggregate, StatisticsReport, StdoutReporter,
};
use tracing_subscriber::EnvFilter;

const INDEX: &str = "searchload-demo";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ConnectionConfig::from_env()?;

    // setup
    let admin = OpenSearch::open(&config)?;
    let created = admin.create_index(INDEX, 1, 0).await?;
    tracing::info!(%created, "index ready");

    // one seed for the run, one forked source per virtual user
    let mut seeds = config.random_source();
    let sources: Vec<RandomSource> = (0..16).map(|_| seeds.fork()).collect();

    let scenario = Scenario::builder()
        .name("create documents")
        .connect(|i: usize| -> searchload::Result<OpenSearch> {
            Ok(OpenSearch::new(
                searchload::Connection::open(&config)?,
                sources[i].clone(),
            ))
        })
        .action(|os: Arc<OpenSearch>| async move { os.create_document(INDEX, None, None).await })
        .build();

    let results: StatisticsAggregate = ConstantVus::builder()
        .vus(sources.len())
        .duration(Duration::from_secs(10))
        .build()
        .run(&scenario)
        .await?;

    // teardown
    let deleted = admin.delete_index(INDEX).await?;
    tracing::info!(%deleted, "index removed");

    StdoutReporter.report(&StatisticsReport::from(results)).await
}
