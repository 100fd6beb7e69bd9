use std::sync::Arc;

use crate::error::Result;
use crate::models::ServiceStatus;
use crate::traits::Store;

/// Administrative status snapshot and reset.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn Store>,
}

impl AdminService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn status(&self) -> Result<ServiceStatus> {
        Ok(self.store.status().await?)
    }

    /// Deletes every user, forum, thread, post and vote.
    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await?;
        log::warn!("all forum data cleared");
        Ok(())
    }
}
