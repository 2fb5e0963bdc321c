use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("searchctl=info,searchctl_api=info")),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
