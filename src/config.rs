//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "testdrive")]
#[command(about = "Vehicle test-drive booking service")]
pub struct Config {
    /// Path to the JSON dataset file
    #[arg(short = 'f', long = "file", env = "TESTDRIVE_DATASET")]
    pub dataset: PathBuf,

    /// Port for the HTTP API
    #[arg(short, long, env = "TESTDRIVE_PORT", default_value_t = 8081)]
    pub port: u16,

    /// Address to bind the HTTP API on
    #[arg(long, env = "TESTDRIVE_BIND", default_value = "0.0.0.0")]
    pub bind: String,

    /// Expose Prometheus metrics on this port
    #[arg(long, env = "TESTDRIVE_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Write every booking mutation back to the dataset file
    #[arg(long, env = "TESTDRIVE_PERSIST")]
    pub persist: bool,
}

impl Config {
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {addr}: {e}"))
    }

    /// Where mutations are written back, if anywhere.
    pub fn persist_path(&self) -> Option<PathBuf> {
        self.persist.then(|| self.dataset.clone())
    }
}
