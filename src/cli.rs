use clap::Parser;
use std::net::SocketAddr;

/// CLIの定義
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "HTTP-triggered service that maintains a bounded blocklist of IP networks in object storage."
)]
pub struct Cli {
    #[arg(
        short = 'l',
        long = "listen",
        default_value = "0.0.0.0:8080",
        required = false,
        hide_default_value = true,
        help = "Socket address the HTTP adapter listens on.\ndefault: 0.0.0.0:8080"
    )]
    pub listen: SocketAddr,

    #[arg(
        long = "max-retries",
        default_value_t = 3,
        required = false,
        hide_default_value = true,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of attempts for each object storage request (minimum 1).\ndefault: 3"
    )]
    pub max_retries: u32,

    #[arg(
        long = "max-backoff-sec",
        default_value_t = 8,
        required = false,
        hide_default_value = true,
        help = "Upper bound in seconds for the exponential backoff between retries.\ndefault: 8"
    )]
    pub max_backoff_secs: u64,

    #[arg(
        long = "timeout-sec",
        default_value_t = 10,
        required = false,
        hide_default_value = true,
        help = "Request timeout in seconds for object storage calls.\ndefault: 10"
    )]
    pub timeout_secs: u64,
}
