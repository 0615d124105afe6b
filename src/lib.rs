pub mod config;
pub mod core;
pub mod engines;
pub mod facade;
pub mod orchestrator;
pub mod proxy;
pub mod registry;
pub mod transport;

pub use core::error::{ConfigError, EngineError, TranslateError};
pub use core::types::*;
pub use facade::TranslationFacade;
pub use orchestrator::{CancelHandle, EngineOrchestrator, EngineOrchestratorBuilder};
