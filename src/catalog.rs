use async_trait::async_trait;

use crate::error::Result;
use crate::types::{MovieDetail, ResultsPage, Selector};

/// The catalog capability the controllers are written against. The live
/// implementation is `Tmdb`; tests drive the controllers with a scripted
/// stand-in instead of the network.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<ResultsPage>;
    async fn movie(&self, id: u64) -> Result<MovieDetail>;
}
