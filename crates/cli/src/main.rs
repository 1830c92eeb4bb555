use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "pricecast", about = "Electricity price prediction client")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit one prediction request and print the result.
    Predict(commands::PredictArgs),

    /// Show recent predictions as a chart and a table.
    History,

    /// Show the serving model's metadata and feature importance.
    About,

    /// Check whether the model service is up and has a model loaded.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let settings = pricecast_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let backend = match pricecast_core::client::http::HttpBackend::from_settings(&settings) {
        Ok(backend) => backend,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            return Err(err);
        }
    };

    tracing::debug!(
        api_url = settings.api_url(),
        ml_url = settings.ml_url(),
        "pricecast starting"
    );

    let ok = match args.command {
        Command::Predict(predict) => commands::predict(&backend, predict).await?,
        Command::History => commands::history(&backend).await,
        Command::About => commands::about(&backend).await,
        Command::Health => commands::health(&backend).await,
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_sentry(settings: &pricecast_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
