//! Bounded pool of conversion workers.
//!
//! `ConversionPool` runs image conversions as tokio tasks. Admission is
//! controlled by a semaphore holding one permit per slot: `submit` waits for a
//! free permit before spawning, so the caller (the sync walk) stalls instead of
//! queueing unbounded work. Each job owns its permit and gives it back when the
//! task ends, whether the conversion succeeded, failed, or panicked. `drain`
//! waits for every outstanding job.
//!
//! # Example
//!
//! ```ignore
//! use syncpics_core::pool::{ConversionPool, PoolConfig};
//!
//! let mut pool = ConversionPool::new(Arc::new(converter), PoolConfig::default());
//! for job in jobs {
//!     pool.submit(job).await?; // waits while all slots are busy
//! }
//! for outcome in pool.drain().await {
//!     if let Err(e) = outcome.result {
//!         eprintln!("{}: {}", outcome.job.job_id, e);
//!     }
//! }
//! ```

mod config;
mod types;
mod worker_pool;

pub use config::{default_max_concurrency, PoolConfig};
pub use types::{JobOutcome, PoolStatus};
pub use worker_pool::{ConversionPool, PoolError};
