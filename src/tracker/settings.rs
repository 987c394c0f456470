extern crate log;
extern crate tokio;

use crate::{curve::ReviewSettings, storage::StoreError, store::ProblemStore};
use log::info;
use std::sync::Arc;
use tokio::sync::watch;

pub type SettingsWatch = watch::Receiver<Arc<ReviewSettings>>;

/// Publishes immutable settings snapshots to running episodes.
///
/// Episodes take the current snapshot when they start; a reload only affects
/// episodes that start afterwards.
pub struct SettingsReloader {
    store: Arc<ProblemStore>,
    tx: watch::Sender<Arc<ReviewSettings>>,
}
impl SettingsReloader {
    pub async fn load(store: Arc<ProblemStore>) -> Result<(Self, SettingsWatch), StoreError> {
        let settings = store.load_settings().await?;
        info!("Loaded forgetting curve {:?}", settings.forgetting_curve);
        let (tx, rx) = watch::channel(Arc::new(settings));
        Ok((Self { store, tx }, rx))
    }
    /// Re-reads settings after the configuration was saved elsewhere.
    pub async fn reload(&self) -> Result<Arc<ReviewSettings>, StoreError> {
        let settings = Arc::new(self.store.load_settings().await?);
        info!("Reloaded forgetting curve {:?}", settings.forgetting_curve);
        self.tx.send_replace(settings.clone());
        Ok(settings)
    }
}
