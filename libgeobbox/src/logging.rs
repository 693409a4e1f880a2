use std::env;

use env_logger::Builder;
use error_chain::ChainedError;

use errors::*;

// Payload stdout carries results back to the host and any output on stderr from a reduce is
// treated as a failure, so only errors are logged unless RUST_LOG says otherwise.
const DEFAULT_LOG_CONFIG: &str = "error";

pub fn init_logger() -> Result<()> {
    let mut builder = Builder::new();
    match env::var("RUST_LOG") {
        Ok(log_config) => builder.parse_filters(&log_config),
        Err(_) => builder.parse_filters(DEFAULT_LOG_CONFIG),
    };

    builder.try_init().chain_err(|| "Failed to build env_logger")?;
    Ok(())
}

pub fn output_error<E: ChainedError>(err: &E) {
    error!("{}", err);

    for e in err.iter().skip(1) {
        error!("caused by: {}", e);
    }

    if let Some(backtrace) = err.backtrace() {
        error!("backtrace: {:?}", backtrace);
    }
}
