use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{remote_error, SupabaseClient};
use crate::domain::KanbanError;

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Clone)]
pub struct RestClient {
    client: SupabaseClient,
    access_token: String,
}

impl RestClient {
    pub fn new(client: SupabaseClient, access_token: &str) -> Self {
        Self {
            client,
            access_token: access_token.to_string(),
        }
    }

    pub fn table(&self, table: &str) -> TableQuery<'_> {
        TableQuery {
            rest: self,
            table: table.to_string(),
            columns: "*".into(),
            filters: Vec::new(),
            order: Vec::new(),
            foreign_order: Vec::new(),
            limit: None,
        }
    }
}

/// One request against a table, built up filter by filter.
#[derive(Debug)]
pub struct TableQuery<'a> {
    rest: &'a RestClient,
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    foreign_order: Vec<(String, String)>,
    limit: Option<usize>,
}

impl TableQuery<'_> {
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(order_term(column, ascending));
        self
    }

    /// Orders rows of an embedded relation, e.g. the `cards` inside `lists`.
    pub fn order_embedded(mut self, relation: &str, column: &str, ascending: bool) -> Self {
        self.foreign_order
            .push((format!("{relation}.order"), order_term(column, ascending)));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.iter().cloned());

        if !self.order.is_empty() {
            pairs.push(("order".into(), self.order.join(",")));
        }
        pairs.extend(self.foreign_order.iter().cloned());

        if let Some(limit) = self.limit {
            pairs.push(("limit".into(), limit.to_string()));
        }

        pairs
    }

    pub async fn fetch_all<T: DeserializeOwned>(self) -> Result<Vec<T>, KanbanError> {
        tracing::debug!(table = self.table.as_str(), "select rows");

        let response = self.request(Method::GET).send().await?;
        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// Reads exactly one row. Zero matching rows is `NotFound`.
    pub async fn fetch_single<T: DeserializeOwned>(self) -> Result<T, KanbanError> {
        tracing::debug!(table = self.table.as_str(), "select single row");

        let response = self
            .request(Method::GET)
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(KanbanError::NotFound(format!(
                "No matching row in {}",
                self.table
            )));
        }

        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// Inserts one row and reads it back with the selected columns.
    pub async fn insert_single<B, T>(self, row: &B) -> Result<T, KanbanError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(table = self.table.as_str(), "insert row");

        let response = self
            .rest
            .client
            .http()
            .post(self.rest.client.rest_url(&self.table))
            .header("apikey", self.rest.client.anon_key())
            .bearer_auth(&self.rest.access_token)
            .header("Prefer", "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .header(CONTENT_TYPE, "application/json")
            .query(&[("select", self.columns.as_str())])
            .body(serde_json::to_vec(row)?)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    fn request(&self, method: Method) -> reqwest::RequestBuilder {
        self.rest
            .client
            .http()
            .request(method, self.rest.client.rest_url(&self.table))
            .header("apikey", self.rest.client.anon_key())
            .bearer_auth(&self.rest.access_token)
            .query(&self.query_pairs())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, KanbanError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(remote_error(response).await)
        }
    }
}

fn order_term(column: &str, ascending: bool) -> String {
    let direction = if ascending { "asc" } else { "desc" };
    format!("{column}.{direction}")
}
