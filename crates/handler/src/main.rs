//! Lambda function driving failover, failback and status polling of an
//! Aurora global database.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use failover_cluster_rds::RdsClientFactory;
use failover_handler::{FailoverHandler, Response};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use tracing::{Instrument, info, info_span};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    /// One JSON object per line, for CloudWatch.
    Json,

    /// Human readable multi-line output.
    Pretty,
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Override the RDS endpoint (e.g. a local emulator)
    #[arg(long, env = "FAILOVER_RDS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Log filter directive, in `tracing_subscriber::EnvFilter` syntax
    #[arg(long, default_value = "info", env = "FAILOVER_LOG_FILTER")]
    log_filter: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Json, env = "FAILOVER_LOG_FORMAT")]
    log_format: LogFormat,
}

fn init_tracing(args: &Args) -> Result<(), Error> {
    let filter = EnvFilter::try_new(&args.log_filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match args.log_format {
        // Lambda stamps every line itself.
        LogFormat::Json => builder.json().without_time().try_init()?,
        LogFormat::Pretty => builder.pretty().try_init()?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    init_tracing(&args)?;

    info!("starting failover handler");

    let handler = Arc::new(FailoverHandler::new(RdsClientFactory::new(
        args.endpoint_url,
    )));

    run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        let span = info_span!("request", request_id = %event.context.request_id);

        async move { Ok::<Response, Error>(handler.handle(event.payload).await) }.instrument(span)
    }))
    .await
}
