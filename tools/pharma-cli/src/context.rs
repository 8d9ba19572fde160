//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use pharma_store::{CartStore, FileStore, KeyValueStore};
use pharma_sync::{Connection, InMemoryBackend, SyncClient};

use crate::config::CliConfig;
use crate::demo;
use crate::output::Output;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["pharma.toml", ".pharma.toml", "pharma.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd).unwrap_or_default()
        };

        Ok(Self { config, output, cwd })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some(config);
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find the config file that applies to the working directory, if any.
    pub fn config_file(&self) -> Option<PathBuf> {
        self.cwd.ancestors().find_map(|dir| {
            CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.exists())
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Open the file-backed client storage.
    pub fn storage(&self) -> Result<Arc<dyn KeyValueStore>> {
        let dir = self.resolve_path(&self.config.storage.dir);
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open storage at {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "opened client storage");
        Ok(Arc::new(store))
    }

    /// Open the persisted cart.
    pub fn cart(&self) -> Result<CartStore> {
        Ok(CartStore::with_key(
            self.storage()?,
            self.config.storage.cart_key.clone(),
        ))
    }

    /// A sync client over the demo backend, with the configured retries.
    pub fn client(&self) -> (SyncClient, Arc<InMemoryBackend>) {
        let backend = Arc::new(demo::backend());
        let client = SyncClient::new(Connection::connected(backend.clone()))
            .with_retry(self.config.retry_policy());
        (client, backend)
    }
}
