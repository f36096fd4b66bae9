use axum::Router;
use std::sync::Arc;

use crate::config::CrudConfig;
use crate::controller::GenericController;
use crate::entity::CrudEntity;
use crate::openapi::{DocumentRegistry, FrozenRegistry};
use crate::repository::GenericRepository;
use crate::router::{crud_router, docs_router};

/// Mounts entity surfaces and registers their documentation in one pass.
///
/// ```rust,ignore
/// let (app, docs) = ApiBuilder::new(CrudConfig::default())
///     .version("v1")
///     .entity::<User, _>("users", Arc::new(MemoryRepository::new()))
///     .entity::<Order, _>("orders", Arc::new(MemoryRepository::new()))
///     .build();
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// ```
pub struct ApiBuilder {
    config: CrudConfig,
    version: String,
    registry: DocumentRegistry,
    router: Router,
}

impl ApiBuilder {
    #[must_use]
    pub fn new(config: CrudConfig) -> Self {
        Self {
            registry: DocumentRegistry::new(config.clone()),
            config,
            version: "v1".to_string(),
            router: Router::new(),
        }
    }

    /// Version of the entities registered from now on.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Serves `T` under `{api_prefix}/{version}/{route_path}` and documents it.
    #[must_use]
    pub fn entity<T, R>(mut self, route_path: &str, repository: Arc<R>) -> Self
    where
        T: CrudEntity,
        R: GenericRepository<T, T::Id> + 'static,
    {
        let route_path = route_path.trim_matches('/');
        let base_path = self.config.base_path(&self.version);
        let controller = Arc::new(GenericController::<T, R>::new(repository, self.config.clone()));

        self.registry.register_entity::<T>(
            &base_path,
            route_path,
            &controller.routes(),
            &self.version,
        );
        self.router = self
            .router
            .merge(crud_router(controller, &format!("{base_path}/{route_path}")));

        tracing::debug!(
            entity = %T::entity_name(),
            path = %format!("{base_path}/{route_path}"),
            "Entity routes mounted"
        );
        self
    }

    /// Freezes the registry and adds the documentation routes.
    #[must_use]
    pub fn build(self) -> (Router, Arc<FrozenRegistry>) {
        let registry = Arc::new(self.registry.freeze());
        let router = self
            .router
            .merge(docs_router(Arc::clone(&registry), &self.config.docs_path));
        (router, registry)
    }
}
