//! Relay module - shared state for the vendor relay handlers

use std::sync::Arc;

use crate::config::{ServerConfig, VendorConfig};
use crate::vendor::VendorClient;

/// Shared relay state. Holds no session data: tokens travel with each request.
#[derive(Clone)]
pub struct RelayState {
    pub vendor: Arc<VendorClient>,
    pub server: Arc<ServerConfig>,
}

impl RelayState {
    pub fn new(server: ServerConfig, vendor: &VendorConfig) -> anyhow::Result<Self> {
        let client = VendorClient::new(vendor)?;

        Ok(Self {
            vendor: Arc::new(client),
            server: Arc::new(server),
        })
    }
}
