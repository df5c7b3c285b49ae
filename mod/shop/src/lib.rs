pub mod api;
pub mod model;
pub mod notify;
pub mod service;

use std::sync::Arc;

use axum::Router;
use crustops_core::Module;

use service::ShopService;

/// Shop module — the pizza pre-order storefront and its admin API.
pub struct ShopModule {
    service: Arc<ShopService>,
}

impl ShopModule {
    pub fn new(service: Arc<ShopService>) -> Self {
        Self { service }
    }
}

impl Module for ShopModule {
    fn name(&self) -> &str {
        "api"
    }

    fn routes(&self) -> Router {
        api::router(self.service.clone())
    }
}
