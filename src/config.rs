use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "lightweb", version, about = "Minimal endpoint server")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "LIGHTWEB_BIND", default_value = "127.0.0.1:4221")]
    pub bind: String,

    /// Number of worker threads
    #[arg(long, env = "LIGHTWEB_WORKERS", default_value = "10")]
    pub workers: NonZeroUsize,

    /// Directory served by the download endpoint
    #[arg(long, env = "LIGHTWEB_DIRECTORY")]
    pub directory: Option<PathBuf>,
}
