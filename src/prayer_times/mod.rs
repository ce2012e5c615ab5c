pub mod client;
pub mod sync;

pub use client::{AladhanClient, FetchError, TimingsSource};
pub use sync::SyncPolicy;
