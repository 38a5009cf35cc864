use std::sync::Arc;

use arc_swap::ArcSwapOption;
use axum::Router;
use runtime::AppConfigProvider;
use tracing::{debug, info};

use crate::api::rest::{openapi, routes};
use crate::config::RoomhubConfig;
use crate::contract::client::RoomhubApi;
use crate::domain::service::{today, Service, ServiceConfig};
use crate::gateways::local::RoomhubLocalClient;
use crate::infra::storage::{seed::seed_demo_data, InMemoryStore};

/// Name of this module's section under `modules:` in the config file.
pub const MODULE_NAME: &str = "roomhub";

/// The roomhub module: owns the store and the domain service, and exposes them
/// over REST and as an in-process client.
#[derive(Default)]
pub struct Roomhub {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: ArcSwapOption<Service>,
}

impl Roomhub {
    /// Read `modules.roomhub` from the app config and initialize.
    pub async fn init_from_provider(&self, provider: &AppConfigProvider) -> anyhow::Result<()> {
        let cfg: RoomhubConfig = provider.module_config(MODULE_NAME)?;
        self.init(cfg).await
    }

    /// Build the in-memory store and the service, seeding demo data when configured.
    pub async fn init(&self, cfg: RoomhubConfig) -> anyhow::Result<()> {
        info!("Initializing roomhub module");
        debug!(
            "Loaded roomhub config: seed_demo_data={}, conflict_policy={:?}, max_title_length={}",
            cfg.seed_demo_data, cfg.conflict_policy, cfg.max_title_length
        );

        let store = Arc::new(InMemoryStore::new());
        let service = Arc::new(Service::new(store, ServiceConfig::from(&cfg)));

        if cfg.seed_demo_data {
            seed_demo_data(&service, today()).await?;
        }

        self.service.store(Some(service));
        info!("Roomhub module initialized");
        Ok(())
    }

    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules.
    pub fn client(&self) -> anyhow::Result<Arc<dyn RoomhubApi>> {
        Ok(Arc::new(RoomhubLocalClient::new(self.service()?)))
    }

    pub fn register_rest(&self, router: Router) -> anyhow::Result<Router> {
        info!("Registering roomhub REST routes");
        let router = routes::register_routes(router, self.service()?);
        info!("Roomhub REST routes registered successfully");
        Ok(router)
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        openapi::openapi()
    }
}
