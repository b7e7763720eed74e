use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::db::models::GiveawayMap;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed giveaways file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Flat JSON file holding every live giveaway.
///
/// The whole map is the unit of atomicity: each mutation reads the file,
/// changes the map and rewrites the file. Mutations go through an async
/// mutex so a creation and a sweep deletion cannot lose each other's update.
#[derive(Debug)]
pub struct GiveawayStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl GiveawayStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full map. A missing file is a first run and yields an empty map.
    pub async fn load(&self) -> Result<GiveawayMap, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Overwrite the file with `giveaways`
    pub async fn save(&self, giveaways: &GiveawayMap) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write(giveaways).await
    }

    /// Read-modify-write under the store lock.
    ///
    /// If the read fails nothing is written, so a corrupt file is never
    /// replaced by a partial map.
    pub async fn update<F, T>(&self, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut GiveawayMap) -> T,
    {
        let _guard = self.lock.lock().await;
        let mut giveaways = self.read().await?;
        let result = apply(&mut giveaways);
        self.write(&giveaways).await?;
        Ok(result)
    }

    async fn read(&self) -> Result<GiveawayMap, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No giveaways file at {}, starting empty", self.path.display());
                return Ok(GiveawayMap::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(GiveawayMap::new());
        }

        let mut giveaways: GiveawayMap =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        giveaways.retain(|id, record| {
            record.id = *id;
            if record.is_addressable() {
                true
            } else {
                warn!("Dropping giveaway {} with an invalid channel or guild id", id);
                false
            }
        });

        Ok(giveaways)
    }

    async fn write(&self, giveaways: &GiveawayMap) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(giveaways).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Write next to the target and rename, so a crash never leaves half a file
        let mut tmp = OsString::from(self.path.as_os_str());
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        fs::write(&tmp, json).await.map_err(io_err)?;
        fs::rename(&tmp, &self.path).await.map_err(io_err)?;

        info!(
            "Wrote {} giveaway(s) to {}",
            giveaways.len(),
            self.path.display()
        );
        Ok(())
    }
}
