//! PostgREST-flavored client for the hosted store: table endpoints under
//! `/rest/v1`, api key in headers, inserts returning the created row.

use async_trait::async_trait;
use lovewall_shared::{NewReply, NewResponse, ReplyRow, ResponseRow};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::config::RemoteConfig;
use crate::error::{EngineError, EngineResult};

use super::RemoteStore;

pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: &RemoteConfig) -> EngineResult<HttpStore> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| EngineError::RemoteRejected("invalid api key".into()))?;
        headers.insert("apikey", key);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| EngineError::RemoteRejected("invalid api key".into()))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(HttpStore {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn select<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        limit: usize,
    ) -> EngineResult<Vec<T>> {
        let limit = limit.to_string();
        let resp = self
            .client
            .get(self.table_url(table))
            .query(&[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(EngineError::RemoteRejected(format!(
                "select {table}: {}",
                resp.status()
            )));
        }
        Ok(resp.json().await?)
    }

    async fn insert<T, B>(&self, table: &str, body: &B) -> EngineResult<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let resp = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(EngineError::RemoteRejected(format!(
                "insert {table}: {}",
                resp.status()
            )));
        }
        // Inserts come back as a one-row array.
        let mut rows: Vec<T> = resp.json().await?;
        rows.pop()
            .ok_or_else(|| EngineError::RemoteRejected(format!("insert {table}: empty response")))
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn recent_responses(&self, limit: usize) -> EngineResult<Vec<ResponseRow>> {
        self.select("responses", limit).await
    }

    async fn insert_response(&self, new: &NewResponse) -> EngineResult<ResponseRow> {
        self.insert("responses", new).await
    }

    async fn recent_replies(&self, limit: usize) -> EngineResult<Vec<ReplyRow>> {
        self.select("replies", limit).await
    }

    async fn insert_reply(&self, new: &NewReply) -> EngineResult<ReplyRow> {
        self.insert("replies", new).await
    }
}
