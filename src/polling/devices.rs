//! One-shot device catalog loading

use crate::format::format_error;
use crate::source::CommandSource;
use devcmd_shared::{Device, LoadState};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevicesView {
    pub devices: Vec<Device>,
    pub state: LoadState,
    pub error: Option<String>,
}

/// Loads the device list once per call; there is no retry loop
pub struct DeviceListLoader {
    source: Arc<dyn CommandSource>,
    view: RwLock<DevicesView>,
}

impl DeviceListLoader {
    pub fn new(source: Arc<dyn CommandSource>) -> Self {
        Self {
            source,
            view: RwLock::new(DevicesView::default()),
        }
    }

    /// Fetch the catalog. Calling this again is a manual reload.
    pub async fn load(&self) {
        {
            let mut view = self.view.write().await;
            view.state = LoadState::Loading;
            view.error = None;
        }

        let result = self.source.list_devices().await;

        let mut view = self.view.write().await;
        match result {
            Ok(devices) => {
                info!("Loaded {} devices", devices.len());
                view.devices = devices;
                view.state = LoadState::Ready;
            }
            Err(err) => {
                let message = format_error(&err);
                error!("Loading devices failed: {}", message);
                view.error = Some(message);
                view.state = LoadState::Error;
            }
        }
    }

    pub async fn view(&self) -> DevicesView {
        self.view.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::stub::StubSource;

    #[tokio::test]
    async fn test_load_success() {
        let loader = DeviceListLoader::new(Arc::new(StubSource::new().with_devices(&["d1"])));
        assert_eq!(loader.view().await.state, LoadState::Idle);

        loader.load().await;

        let view = loader.view().await;
        assert_eq!(view.state, LoadState::Ready);
        assert_eq!(view.devices, vec![Device::new("d1")]);
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_load_failure_is_terminal() {
        let loader = DeviceListLoader::new(Arc::new(StubSource::new().with_device_failure("")));

        loader.load().await;

        let view = loader.view().await;
        assert_eq!(view.state, LoadState::Error);
        assert_eq!(view.error.as_deref(), Some("Unknown error"));
        assert!(view.devices.is_empty());
    }
}
