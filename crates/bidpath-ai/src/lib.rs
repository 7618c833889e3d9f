//! Generation layer: backend seam, gateway, stage prompts, and the pipeline
//! stages built on them.

pub mod backend;
pub mod config;
mod error;
mod gateway;
#[cfg(feature = "openai")]
mod openai;
mod pipeline;
pub mod prompts;
pub mod stages;
#[cfg(test)]
mod testing;

pub use backend::{BackendError, GenerateRequest, GenerateResponse, GenerationBackend};
pub use config::GatewayConfig;
pub use error::GenerationFailure;
pub use gateway::Gateway;
#[cfg(feature = "openai")]
pub use openai::OpenAiBackend;
pub use pipeline::Pipeline;
pub use stages::Stage;
