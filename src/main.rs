mod config;
mod http_api;
mod mongo;
mod store;

use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::{config::Config, http_api::AppState, mongo::MongoStudentStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is for local development; deployed environments provide the
    // variables themselves, so a missing file is only worth a log line.
    let dotenv_result = dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if dotenv_result.is_err() {
        info!("no .env file found, using process environment");
    }

    let config = Config::from_env()?;
    info!(port = config.port, "configuration loaded");

    let coll = mongo::connect(&config.mongodb_uri).await?;

    let state = AppState {
        students: Arc::new(MongoStudentStore::new(coll)),
    };

    http_api::run_http_server(&config, state).await
}
