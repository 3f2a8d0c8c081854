use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eyre::{Context, Result};
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::{
    config::{loader::load_config, models::RouterConfig},
    ports::config_provider::ConfigProvider,
};

/// Configuration provider that loads a router config file and watches it for changes.
pub struct FileConfigProvider {
    path: PathBuf,
    // Dropping the watcher stops notifications
    _watcher: Option<notify::RecommendedWatcher>,
    update_tx: mpsc::Sender<()>,
    // Taken once by `watch()`
    update_rx: std::sync::Mutex<Option<mpsc::Receiver<()>>>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (tx, rx) = mpsc::channel(1);

        let mut provider = Self {
            path,
            _watcher: None,
            update_tx: tx,
            update_rx: std::sync::Mutex::new(Some(rx)),
        };

        provider.init_watcher()?;
        Ok(provider)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn init_watcher(&mut self) -> Result<()> {
        let tx = self.update_tx.clone();
        let config_filename = self
            .path
            .file_name()
            .ok_or_else(|| eyre::eyre!("Invalid config path: {}", self.path.display()))?
            .to_owned();

        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                match res {
                    Ok(event) => {
                        if (event.kind.is_modify()
                            || event.kind.is_create()
                            || event.kind.is_remove())
                            && event
                                .paths
                                .iter()
                                .any(|p| p.file_name() == Some(&config_filename))
                        {
                            tracing::debug!("Router config changed: {:?}", event.kind);
                            // A pending signal already covers this change
                            let _ = tx.try_send(());
                        }
                    }
                    Err(e) => tracing::error!("Config watch error: {:?}", e),
                }
            })?;

        let watch_dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        watcher
            .watch(watch_dir, RecursiveMode::NonRecursive)
            .wrap_err("Failed to watch config directory")?;

        self._watcher = Some(watcher);
        Ok(())
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn load_config(&self) -> Result<RouterConfig> {
        let path_str = self
            .path
            .to_str()
            .ok_or_else(|| eyre::eyre!("Invalid path: {}", self.path.display()))?;
        load_config(path_str).await
    }

    fn watch(&self) -> mpsc::Receiver<()> {
        let taken = self.update_rx.lock().ok().and_then(|mut rx| rx.take());
        match taken {
            Some(rx) => rx,
            None => {
                tracing::warn!("Config watch channel already taken; returning a closed channel");
                let (_, rx) = mpsc::channel(1);
                rx
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::File, io::Write};

    use tempfile::tempdir;
    use tokio::time::{Duration, sleep};

    use super::*;

    #[tokio::test]
    async fn test_file_config_provider() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("switchyard.toml");

        let initial_config = r#"
            http_path = "https://example.com/"
            [routes]
            about = "get@about::index"
        "#;
        {
            let mut file = File::create(&file_path)?;
            file.write_all(initial_config.as_bytes())?;
        }

        let provider = FileConfigProvider::new(&file_path)?;
        let config = provider.load_config().await?;
        assert_eq!(config.routes.len(), 1);

        let mut rx = provider.watch();

        let new_config = r#"
            http_path = "https://example.org/"
            [routes]
            about = "get@about::index"
            contact = "get@contact::index"
        "#;

        // Let the watcher settle before rewriting
        sleep(Duration::from_millis(100)).await;

        {
            let mut file = File::create(&file_path)?;
            file.write_all(new_config.as_bytes())?;
        }

        let notification = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert!(notification.is_ok(), "Timed out waiting for config update");
        assert!(
            notification.unwrap().is_some(),
            "Channel closed unexpectedly"
        );

        let config = provider.load_config().await?;
        assert_eq!(config.http_path, "https://example.org/");
        assert_eq!(config.routes.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_second_watch_is_closed() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("switchyard.toml");
        File::create(&file_path)?;

        let provider = FileConfigProvider::new(&file_path)?;
        let _first = provider.watch();
        let mut second = provider.watch();
        assert!(second.recv().await.is_none());
        Ok(())
    }
}
