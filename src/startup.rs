use crate::config::{AppConfig, StoreBackend, SummarizerProvider};
use crate::error::AppError;
use crate::handlers;
use crate::handlers::documents::MAX_UPLOAD_BYTES;
use crate::services::{
    AnalysisService, ContentExtractor, DocumentStore, GeminiSummarizer, MemoryStore, MockSummarizer,
    MongoStore, Summarizer,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DocumentStore>,
    pub analysis: Arc<AnalysisService>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: AppConfig) -> Result<Self, AppError> {
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Mongo => {
                let mongo = config.store.mongodb.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!("MongoDB configuration missing"))
                })?;
                let store = MongoStore::connect(&mongo.uri, &mongo.database)
                    .await
                    .map_err(AppError::from)?;
                store.initialize_indexes().await.map_err(AppError::from)?;
                Arc::new(store)
            }
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };

        let summarizer: Arc<dyn Summarizer> = match config.summarizer.provider {
            SummarizerProvider::Gemini => {
                let gemini = config.summarizer.gemini.clone().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!("Gemini configuration missing"))
                })?;
                Arc::new(GeminiSummarizer::new(gemini))
            }
            SummarizerProvider::Mock => Arc::new(MockSummarizer::new()),
        };

        Self::build_with(config, store, summarizer).await
    }

    /// Builds the application with injected collaborators; the seam the
    /// integration tests use to swap in an in-memory store and a canned or
    /// failing summarizer.
    pub async fn build_with(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<Self, AppError> {
        let analysis = Arc::new(AnalysisService::new(
            store.clone(),
            summarizer,
            ContentExtractor::new(config.extraction_mode),
        ));

        let state = AppState {
            config: config.clone(),
            store,
            analysis,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/users/register", post(handlers::register_user))
            .route("/documents/analyze", post(handlers::analyze_document))
            .route("/documents/history", get(handlers::get_document_history))
            .route(
                "/documents/:id",
                get(handlers::get_document).delete(handlers::delete_document),
            )
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.state.store.clone()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
