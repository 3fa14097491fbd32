//! Provider-agnostic LLM completion client.
//!
//! Wraps the OpenAI chat completions API and the Anthropic messages API behind
//! a single [`LlmProvider`] trait, and chains providers in a [`ProviderPool`]
//! that falls back to the next provider when one fails.
//!
//! # Example
//!
//! ```rust,ignore
//! use ai_client::{Anthropic, OpenAi, ProviderPool};
//! use std::sync::Arc;
//!
//! let pool = ProviderPool::new(3)
//!     .with_provider(Arc::new(OpenAi::from_env()?))
//!     .with_provider(Arc::new(Anthropic::from_env()?));
//!
//! let completion = pool.complete("Descreva o mercado de fitness", 500).await?;
//! println!("{} answered: {}", completion.provider, completion.text);
//! ```

pub mod anthropic;
pub mod error;
pub mod health;
pub mod openai;
pub mod pool;
pub mod provider;
pub mod types;

pub use anthropic::Anthropic;
pub use error::{AiError, Result};
pub use health::{ProviderHealth, ProviderStatus, DEFAULT_MAX_ERRORS};
pub use openai::OpenAi;
pub use pool::ProviderPool;
pub use provider::LlmProvider;
pub use types::{Completion, Message, Usage};
