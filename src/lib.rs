pub mod config;
pub mod models;
pub mod processing;
pub mod validation;
pub mod utils;
pub mod passport_validator;

pub use config::{AssemblerConfig, EngineConfig};
pub use models::{Detection, MrzFormat, MrzResult, PipelineStage, Rejection};
pub use passport_validator::PassportValidator;
pub use utils::MrzError;
