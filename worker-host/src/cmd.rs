use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "worker-host", about = "Runs a scoped unit of work on a fixed interval")]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait between iterations (default 10)
    #[arg(long, value_name = "SECS")]
    pub interval_secs: Option<u64>,

    /// Name of the scoped service resolved each iteration
    #[arg(long, value_name = "NAME")]
    pub service: Option<String>,

    /// Log filter, e.g. info or worker_host=debug
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Export tracing spans to stdout through OpenTelemetry
    #[arg(long, default_value_t = false)]
    pub otel_stdout: bool,
}
