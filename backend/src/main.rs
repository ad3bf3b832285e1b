use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use podu_backend::{
    foss_tools::FossToolsCatalog, media_storage::S3MediaStorage, server, types::Environment,
};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // Datadog in deployed environments, plain logs locally
    let tracer = match environment {
        Environment::Production | Environment::Staging => Some(datadog_tracing::init()?),
        Environment::Development { .. } => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
            None
        }
    };

    tracing::info!("Starting podu in {:?} environment", environment);

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let media_storage = Arc::new(S3MediaStorage::new(
        s3_client,
        environment.bucket_name(),
        environment.public_base_url(),
        environment.presigned_url_expiry_secs(),
    ));

    let foss_tools = Arc::new(FossToolsCatalog::new(environment.foss_tools_path()));
    tracing::info!("Serving FOSS tools from {}", foss_tools.path().display());

    let result = server::start(environment, media_storage, foss_tools).await;

    if let Some((_guard, tracer_shutdown)) = tracer {
        tracer_shutdown.shutdown();
    }

    result
}
