//! Domain entities.

mod cache_entry;
mod response;

pub use cache_entry::{CacheEntry, CacheKey, ResponseMetadata};
pub use response::{FetchedResponse, HttpResponse};
