use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use serde::Deserialize;
use tracing::info;

use moviehub_admin::config::settings::ClientConfig;
use moviehub_admin::{
    ActionKind, HttpTransport, ListManager, ListOptions, PageCache, ResourceApi, RowAction,
    Session, StatusOption, TracingNotifier,
};

#[derive(Debug, Clone, Deserialize)]
struct MovieRow {
    id: String,
    name: String,
    #[serde(default)]
    status: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = ClientConfig::new().context("missing client configuration")?;
    info!("Connecting to {}", config.api_base_url);

    let transport = Arc::new(HttpTransport::new(&config)?);
    let cache = Arc::new(PageCache::new());
    let notifier = Arc::new(TracingNotifier);

    // Grants would normally come from the login flow.
    let session = Session::new(["MOVIE_L", "MOVIE_C", "MOVIE_U", "MOVIE_D"], Some(1));

    let options = ListOptions::<MovieRow>::new("movie", ResourceApi::crud("/v1/movie", "MOVIE"))
        .with_page_size(config.page_size)
        .with_statuses(vec![
            StatusOption::new(1, "Active"),
            StatusOption::new(0, "Draft"),
            StatusOption::new(-1, "Locked"),
        ])
        .with_actions(vec![
            RowAction::new(ActionKind::Edit).with_permission("MOVIE_U"),
            RowAction::new(ActionKind::Delete).with_permission("MOVIE_D"),
        ]);

    let movies = ListManager::new(options, session, transport, cache, notifier, "");
    movies.fetch().await?;

    let snapshot = movies.snapshot().await;
    info!(
        "Fetched page {}/{} ({} movies total)",
        snapshot.pagination.current,
        snapshot.pagination.total_pages,
        snapshot.pagination.total_elements
    );
    for row in &snapshot.rows {
        let status = movies.status_label(row.status).unwrap_or("Unknown");
        let actions = movies.visible_actions(row).len();
        info!("{} [{}] {} ({} actions)", row.id, status, row.name, actions);
    }

    Ok(())
}
