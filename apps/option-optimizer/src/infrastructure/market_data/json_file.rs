//! Option chain snapshot stored as a JSON file.
//!
//! The file holds an array of contracts:
//!
//! ```json
//! [
//!   {"symbol": "IDX C8200", "underlying": "IDX", "strike": "8200",
//!    "kind": "Call", "expiration": "2026-12-18", "reference_price": "95.5",
//!    "volume": 1200}
//! ]
//! ```
//!
//! Contracts are validated while decoding, so a file with a negative price
//! or a zero strike is rejected as a whole.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{ChainSourceError, ChainSourcePort};
use crate::options::Contract;

/// Chain source reading a JSON snapshot from disk on every call.
#[derive(Debug, Clone)]
pub struct JsonFileChainSource {
    path: PathBuf,
}

impl JsonFileChainSource {
    /// Read chains from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ChainSourcePort for JsonFileChainSource {
    async fn option_chain(&self, underlying: &str) -> Result<Vec<Contract>, ChainSourceError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ChainSourceError::DataUnavailable {
                message: format!("{}: {e}", self.path.display()),
            }
        })?;

        let contracts: Vec<Contract> =
            serde_json::from_str(&contents).map_err(|e| ChainSourceError::InvalidData {
                message: format!("{}: {e}", self.path.display()),
            })?;

        let chain: Vec<Contract> = contracts
            .into_iter()
            .filter(|c| c.underlying() == underlying)
            .collect();
        if chain.is_empty() {
            return Err(ChainSourceError::UnderlyingNotFound {
                underlying: underlying.to_string(),
            });
        }

        debug!(
            path = %self.path.display(),
            underlying,
            contracts = chain.len(),
            "Read option chain snapshot"
        );
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"[
        {"symbol": "IDX C8200", "underlying": "IDX", "strike": "8200", "kind": "Call",
         "expiration": "2026-12-18", "reference_price": "95.5", "volume": 1200},
        {"symbol": "IDX P8000", "underlying": "IDX", "strike": 8000, "kind": "Put",
         "expiration": "2026-12-18", "reference_price": 60},
        {"symbol": "OTH C10", "underlying": "OTH", "strike": "10", "kind": "Call",
         "expiration": "2026-12-18"}
    ]"#;

    fn write_snapshot(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_reads_chain_for_underlying() {
        let file = write_snapshot(SNAPSHOT);
        let source = JsonFileChainSource::new(file.path());

        let chain = source.option_chain("IDX").await.unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].volume(), Some(1200));
        assert_eq!(chain[1].volume(), None);

        let other = source.option_chain("OTH").await.unwrap();
        assert_eq!(other[0].reference_price(), rust_decimal::Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_underlying() {
        let file = write_snapshot(SNAPSHOT);
        let source = JsonFileChainSource::new(file.path());
        assert!(matches!(
            source.option_chain("NOPE").await,
            Err(ChainSourceError::UnderlyingNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_contract_rejects_file() {
        let file = write_snapshot(
            r#"[{"symbol": "X", "underlying": "IDX", "strike": "0", "kind": "Call",
                 "expiration": "2026-12-18"}]"#,
        );
        let source = JsonFileChainSource::new(file.path());
        assert!(matches!(
            source.option_chain("IDX").await,
            Err(ChainSourceError::InvalidData { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileChainSource::new(dir.path().join("missing.json"));
        assert!(matches!(
            source.option_chain("IDX").await,
            Err(ChainSourceError::DataUnavailable { .. })
        ));
    }
}
