//! Record store: loads sales snapshots and memoizes them per query.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::fetch::{HttpClient, SalesQuery, fetch_bytes};
use crate::parser::parse_records;
use crate::records::SaleRecord;

/// Something that can produce the sales records for a query.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn load(&self, query: &SalesQuery) -> Result<Vec<SaleRecord>>;
}

/// Loads records from the products HTTP API.
pub struct HttpRecordSource<C> {
    client: C,
    base_url: reqwest::Url,
}

impl<C: HttpClient> HttpRecordSource<C> {
    pub fn new(client: C, base_url: &str) -> Result<Self> {
        let base_url = reqwest::Url::parse(base_url)
            .with_context(|| format!("invalid sales API URL: {}", base_url))?;
        Ok(Self { client, base_url })
    }

    /// Full request URL for `query`.
    pub fn url_for(&self, query: &SalesQuery) -> reqwest::Url {
        let mut url = self.base_url.clone();
        query.apply(&mut url);
        url
    }
}

#[async_trait]
impl<C: HttpClient> RecordSource for HttpRecordSource<C> {
    #[tracing::instrument(skip(self), fields(region = %query.region, year = ?query.year))]
    async fn load(&self, query: &SalesQuery) -> Result<Vec<SaleRecord>> {
        let url = self.url_for(query);
        let bytes = fetch_bytes(&self.client, url.clone())
            .await
            .with_context(|| format!("failed to fetch {}", url))?;
        let records = parse_records(&bytes)?;
        info!(records = records.len(), "Sales data loaded");
        Ok(records)
    }
}

/// Owns the loaded snapshots. Each distinct query hits the source once;
/// later calls share the cached, immutable snapshot.
pub struct RecordStore<S> {
    source: S,
    cache: HashMap<SalesQuery, Arc<[SaleRecord]>>,
}

impl<S: RecordSource> RecordStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    /// Returns the snapshot for `query`, loading it on first use.
    pub async fn records(&mut self, query: &SalesQuery) -> Result<Arc<[SaleRecord]>> {
        if let Some(cached) = self.cache.get(query) {
            debug!(region = %query.region, year = ?query.year, "Record cache hit");
            return Ok(Arc::clone(cached));
        }

        let loaded: Arc<[SaleRecord]> = self.source.load(query).await?.into();
        self.cache.insert(*query, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drops the snapshot for `query`; the next call reloads it.
    pub fn invalidate(&mut self, query: &SalesQuery) -> bool {
        self.cache.remove(query).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }
}
