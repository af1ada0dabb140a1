pub mod api;
pub mod client;
pub mod payload;
pub mod resilience;
pub mod resolver;
pub mod static_file;

pub use api::{ApiSource, HealthCheck};
pub use client::{DataSource, SourceClientConfig};
pub use resilience::{retry_with_backoff, RetryConfig};
pub use resolver::{first_success, DataSourceResolver, Resolved};
pub use static_file::{Location, StaticSource};
