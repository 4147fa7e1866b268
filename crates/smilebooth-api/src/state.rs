//! Application state.

use std::sync::Arc;

use tracing::{error, info, warn};

use smilebooth_media::{CascadeProvisioner, ClassifierSet, SmilePipeline};
use smilebooth_models::ClassifierHealth;
use smilebooth_storage::CaptureStore;

use crate::config::ApiConfig;

/// Shared application state.
///
/// Everything in here is built once at startup and only read by handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<SmilePipeline>,
    pub store: Arc<CaptureStore>,
}

impl AppState {
    /// Create application state: prepare directories, provision and load
    /// the cascades.
    ///
    /// Only an unusable image directory is fatal; cascade problems leave the
    /// booth running in degraded mode.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let store = CaptureStore::new(&config.image_dir);
        store.ensure_dir().await?;

        if config.provision_cascades {
            match CascadeProvisioner::with_base_url(&config.cascade_dir, config.cascade_base_url.clone()) {
                Ok(provisioner) => {
                    let report = provisioner.ensure_all().await;
                    if report.is_complete() {
                        info!(dir = %config.cascade_dir.display(), "Cascade definitions ready");
                    } else {
                        warn!(?report, "Cascade provisioning incomplete");
                    }
                }
                Err(e) => error!("Cascade provisioning skipped: {}", e),
            }
        }

        let classifiers = ClassifierSet::load_cascades(&config.cascade_dir);
        let pipeline = SmilePipeline::new(classifiers);

        Ok(Self::from_parts(config, pipeline, store))
    }

    /// Assemble state from already-built components.
    pub fn from_parts(config: ApiConfig, pipeline: SmilePipeline, store: CaptureStore) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
            store: Arc::new(store),
        }
    }

    pub fn health(&self) -> ClassifierHealth {
        self.pipeline.health()
    }
}
