//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::{
    ContentService, ContentServiceImpl, TaxonomyService, TaxonomyServiceImpl,
};
use crate::config::Settings;
use crate::domain::services::{DefaultSlugGenerator, SlugGenerator, Translator};
use crate::domain::UnitOfWork;
use crate::infrastructure::database::{self, PgUnitOfWork};
use crate::infrastructure::translation;
use crate::presentation::http::handlers::health;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentService>,
    pub taxonomy: Arc<dyn TaxonomyService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the services over any unit-of-work provider
    pub fn new<U>(uow: U, translator: Arc<dyn Translator>, settings: Settings) -> Self
    where
        U: UnitOfWork + Clone + 'static,
    {
        let slugs: Arc<dyn SlugGenerator> = Arc::new(DefaultSlugGenerator::new());
        let content = ContentServiceImpl::new(
            uow.clone(),
            translator,
            slugs.clone(),
            settings.content.slug_retry_limit,
        );
        let taxonomy = TaxonomyServiceImpl::new(uow, slugs);

        Self {
            content: Arc::new(content),
            taxonomy: Arc::new(taxonomy),
            settings: Arc::new(settings),
        }
    }
}

/// Build the router with every middleware layer applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        // Create database pool
        let pool = database::create_pool(&settings.database).await?;
        tracing::info!("Database connection pool created");

        if settings.database.run_migrations {
            database::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        let translator: Arc<dyn Translator> =
            Arc::from(translation::build_translator(&settings.translation)?);

        let addr: SocketAddr = settings.server_addr().parse()?;
        let state = AppState::new(PgUnitOfWork::from_pool(pool), translator, settings);
        let router = build_router(state);

        // Bind to address
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
