#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use northwind_api::config::AppConfig;
use northwind_api::database::MemoryStore;
use northwind_api::{app, AppState};

/// The real router on an ephemeral port, backed by a freshly seeded memory store.
/// Each test gets its own server so writes never leak between tests.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let config = AppConfig::development();
        let state = AppState::new(Arc::new(MemoryStore::seeded()), config.api.page_size);
        let router = app(state, &config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind ephemeral port")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self.client.put(self.url(path)).json(body).send().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<StatusCode> {
        Ok(self.client.delete(self.url(path)).send().await?.status())
    }
}

/// Ids of the selected entries of a territory checklist
pub fn selected_ids(checklist: &Value) -> Vec<String> {
    checklist
        .as_array()
        .into_iter()
        .flatten()
        .filter(|t| t["isSelected"].as_bool().unwrap_or(false))
        .filter_map(|t| t["territoryId"].as_str().map(str::to_string))
        .collect()
}
