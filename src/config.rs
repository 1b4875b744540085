use anyhow::Result;
use dotenvy::dotenv;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound for a single uploaded spreadsheet, in bytes.
    pub max_file_size: usize,
    pub port: u16,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let max_file_size = std::env::var("MAX_FILE_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(default_max_file_size);

        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Config {
            max_file_size,
            port,
        })
    }
}
