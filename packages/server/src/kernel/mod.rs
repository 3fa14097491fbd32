//! Kernel module - external service adapters and dependencies.

pub mod ai;
pub mod attachments;
pub mod deps;
pub mod progress;
pub mod search;
pub mod serper_client;
pub mod simple_scraper;
pub mod tavily_client;
pub mod test_dependencies;
pub mod traits;

pub use ai::build_provider_pool;
pub use attachments::TextAttachmentProcessor;
pub use deps::ServerDeps;
pub use progress::{ProgressHub, ProgressSnapshot, SessionProgress};
pub use search::SearchService;
pub use simple_scraper::SimpleScraper;
pub use test_dependencies::TestDependencies;
pub use traits::*;
