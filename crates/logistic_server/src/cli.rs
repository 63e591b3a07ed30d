use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8050)]
    pub port: u16,

    /// Path prefix the page and API are mounted under
    #[arg(long, default_value = "/dash_logistica/")]
    pub prefix: String,

    /// Path to config TOML (defaults are used when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "logistic_core=debug"
    #[arg(long, default_value = "info")]
    pub log: String,
}
