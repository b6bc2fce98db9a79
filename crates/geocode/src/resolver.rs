//! Place resolution seam used by the session

use crate::client::GeocodeClient;
use crate::endpoints::reverse::{PlaceQuery, PlaceResponse};
use crate::error::GeocodeResult;
use async_trait::async_trait;

/// Anything that can turn a coordinate pair into a place
#[async_trait]
pub trait PlaceResolver: Send + Sync {
    /// Resolve the place at `query`
    async fn resolve(&self, query: &PlaceQuery) -> GeocodeResult<PlaceResponse>;
}

#[async_trait]
impl PlaceResolver for GeocodeClient {
    async fn resolve(&self, query: &PlaceQuery) -> GeocodeResult<PlaceResponse> {
        self.reverse().lookup(query).await
    }
}
