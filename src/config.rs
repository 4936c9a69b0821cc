use crate::error::{AppError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Uniswap v3 mainnet subgraph on The Graph decentralized network.
pub const SUBGRAPH_ID: &str = "5zvR82QoaXYFyDEKLZ9t6v9adgnptxYpKpSbxtgVENFV";

const GATEWAY_URL: &str = "https://gateway.thegraph.com/api";

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub subgraph_id: String,
    pub output_dir: PathBuf,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("subgraph_id", &self.subgraph_id)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl AppConfig {
    /// Reads `API_KEY` from the process environment, after pulling in a
    /// `.env` file from the working directory if one exists.
    pub fn from_env(output_dir: &Path) -> Result<Self> {
        if let Err(err) = dotenv::dotenv() {
            tracing::debug!("no .env file loaded: {}", err);
        }
        Self::from_lookup(|key| std::env::var(key).ok(), output_dir)
    }

    pub fn from_lookup<F>(lookup: F, output_dir: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(AppError::MissingApiKey)?;

        Ok(Self {
            api_key,
            subgraph_id: SUBGRAPH_ID.to_string(),
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/subgraphs/id/{}",
            GATEWAY_URL, self.api_key, self.subgraph_id
        )
    }
}
