//! Domain error types.

mod load_error;
mod store_error;

pub use load_error::{DecodeError, LoadError, TransportError};
pub use store_error::StoreError;
