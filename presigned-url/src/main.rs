use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use presigned_url::{
    cli,
    object_store::S3ObjectStore,
    provider::SignedUrlProvider,
    types::{CliError, StorageConfig},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A local .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();

    // stdout carries the report, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        _ => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    let outcome = cli::run(env::args_os(), connect).await;

    print!("{}", outcome.stdout);
    eprint!("{}", outcome.stderr);
    outcome.exit_code()
}

async fn connect() -> Result<(SignedUrlProvider, String), CliError> {
    let config = StorageConfig::from_env()?;
    info!(
        "Using bucket {} with prefix {}",
        config.bucket_name, config.images_prefix
    );

    let store = S3ObjectStore::from_config(&config).await?;
    let provider = SignedUrlProvider::new(Arc::new(store), &config);

    Ok((provider, config.bucket_name))
}
