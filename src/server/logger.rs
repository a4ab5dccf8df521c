use tracing_subscriber::{Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::server::config::{LoggerConfig, LoggerFormat};

/// Install the global `tracing` subscriber. Later calls are ignored.
pub fn init_logger(opts: &LoggerConfig) {
    let env_filter = tracing_subscriber::EnvFilter::new(&opts.level);

    let stdout_layer = match opts.format {
        LoggerFormat::Pretty => fmt::Layer::default().pretty().boxed(),
        LoggerFormat::Json => fmt::Layer::default().json().boxed(),
        LoggerFormat::Compact => fmt::Layer::default().compact().boxed(),
    };

    if let Err(err) = Registry::default()
        .with(stdout_layer)
        .with(env_filter)
        .try_init()
    {
        eprintln!("logger already initialised: {err}");
    }
}
