pub mod retry;

pub use retry::{default_backoff, retry_transport};
