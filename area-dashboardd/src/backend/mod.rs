pub mod client;

use async_trait::async_trait;
use shared::types::AreaRecord;
use crate::error::Result;

pub use client::HttpAreaSource;

/// Where the dashboard gets its area snapshots from.
#[async_trait]
pub trait AreaSource: Send + Sync {
    /// Fetch the complete, ordered list of areas.
    async fn fetch_areas(&self) -> Result<Vec<AreaRecord>>;
}
