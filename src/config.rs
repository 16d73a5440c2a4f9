use std::path::PathBuf;

use clap::Parser;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5003;

#[derive(Parser, Debug)]
#[command(name = "spectrum-sorter")]
#[command(about = "Serve tab-delimited spectra tables to the browser viewer")]
#[command(version)]
pub struct Args {
    /// Folder containing data to serve (searched recursively for *.txt)
    #[arg(short = 'd', long = "data", env = "SORTER_DATA")]
    pub data: PathBuf,

    /// Port used for the server
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "SORTER_PORT")]
    pub port: u16,

    /// Start just the server and don't automatically open the browser
    #[arg(long)]
    pub server: bool,

    /// Front-end assets served for any path outside the data API
    #[arg(long, default_value = "static", env = "SORTER_STATIC_DIR")]
    pub static_dir: PathBuf,
}

impl Args {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            port: self.port,
            open_browser: !self.server,
            static_dir: Some(self.static_dir.clone()),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub open_browser: bool,
    /// Fallback directory for front-end assets; ignored if it does not exist.
    pub static_dir: Option<PathBuf>,
}
