use std::time::Duration;

use anyhow::{anyhow, Context};
use serde_json::Value;

/// Thin HTTP client over the admin API
pub struct ApiClient {
    base_url: url::Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(server: &str) -> anyhow::Result<Self> {
        let mut base_url = url::Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        // Without a trailing slash `join` would replace the last segment of a prefixed base
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { base_url, http })
    }

    pub fn url(&self, path: &str) -> anyhow::Result<url::Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("invalid path '{}'", path))
    }

    /// GET `path`, skipping query pairs whose value is `None`
    pub async fn get(&self, path: &str, query: &[(&str, Option<String>)]) -> anyhow::Result<Value> {
        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
            .collect();
        let response = self.http.get(self.url(path)?).query(&pairs).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<()> {
        let response = self.http.delete(self.url(path)?).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Raw GET for endpoints whose status carries meaning (health)
    pub async fn get_raw(&self, path: &str) -> anyhow::Result<(reqwest::StatusCode, Value)> {
        let response = self.http.get(self.url(path)?).send().await?;
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    async fn check(response: reqwest::Response) -> anyhow::Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        let details = body
            .get("field_errors")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(field, msg)| format!("{}: {}", field, msg.as_str().unwrap_or_default()))
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .filter(|s| !s.is_empty());
        match details {
            Some(details) => Err(anyhow!("{} ({}): {}", message, status, details)),
            None => Err(anyhow!("{} ({})", message, status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_onto_base() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        assert_eq!(client.url("/employees/3").unwrap().as_str(), "http://localhost:3000/employees/3");
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn keeps_path_prefix_of_base() {
        for server in ["http://host/api", "http://host/api/"] {
            let client = ApiClient::new(server).unwrap();
            assert_eq!(client.url("/employees").unwrap().as_str(), "http://host/api/employees", "{}", server);
        }
    }
}
