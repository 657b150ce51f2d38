//! Response classification and retry control flow

pub mod classifier;
pub mod retry;

pub use classifier::{Outcome, classify};
pub use retry::{RetryConfig, RetryPolicy};
