use entagen_service::config::AppConfig;
use entagen_service::services::{DocumentStore, MemoryStore, MockSummarizer, Summarizer};
use entagen_service::startup::Application;
use std::sync::Arc;

pub const TEST_USER_ID: &str = "u1";

pub struct TestApp {
    pub address: String,
    pub store: Arc<dyn DocumentStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(MockSummarizer::new())).await
    }

    #[allow(dead_code)]
    pub async fn spawn_with_failing_summarizer() -> Self {
        Self::spawn_with(Arc::new(MockSummarizer::failing())).await
    }

    async fn spawn_with(summarizer: Arc<dyn Summarizer>) -> Self {
        std::env::set_var("STORE_BACKEND", "memory");
        std::env::set_var("SUMMARIZER_PROVIDER", "mock");
        std::env::set_var("EXTRACTION_MODE", "local");

        let mut config = AppConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing

        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());

        let app = Application::build_with(config, store.clone(), summarizer)
            .await
            .expect("Failed to build test application");
        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            store,
        }
    }

    /// Submits a plain-text file for analysis on behalf of `owner`.
    #[allow(dead_code)]
    pub async fn analyze(
        &self,
        client: &reqwest::Client,
        owner: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> reqwest::Response {
        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(bytes)
                .file_name(filename.to_string())
                .mime_str("text/plain")
                .unwrap(),
        );

        client
            .post(format!("{}/documents/analyze", self.address))
            .header("X-User-Id", owner)
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
