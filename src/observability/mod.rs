pub mod metrics;
pub mod observer;

pub use metrics::MetricsObserver;
pub use observer::{CompositeObserver, NoopObserver, TokenObserver, TracingObserver};
