use std::sync::Arc;

use crate::core::RateProvider;

/// Shared handler state. Holds nothing mutable; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn RateProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &dyn RateProvider {
        self.provider.as_ref()
    }
}
