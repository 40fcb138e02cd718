use std::io;

use lovematch_server::logging::{self, LogFormat};
use lovematch_server::{app, serve, ServerConfig};
use lovematch_storage::redact_connection_string;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();
    logging::init(LogFormat::from_env());

    let config = ServerConfig::from_env().map_err(|err| {
        error!(error = %err, "invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
    })?;
    info!(
        store = %redact_connection_string(&config.db_url),
        timeout_ms = config.store_timeout.as_millis() as u64,
        "record store configured"
    );

    let listener = TcpListener::bind(&config.http_addr).await?;
    serve(listener, app(&config)).await
}
