// HTTP routes
pub mod analyses;
pub mod analyze;
pub mod attachments;
pub mod health;
pub mod pdf;
pub mod progress;
pub mod providers;

pub use analyses::*;
pub use analyze::*;
pub use attachments::*;
pub use health::*;
pub use pdf::*;
pub use progress::*;
pub use providers::*;
