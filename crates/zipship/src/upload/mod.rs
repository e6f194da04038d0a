//! The upload pipeline: submission, orchestration, and job finalization.

pub mod config;
pub mod orchestrator;
pub mod request;
pub mod service;

pub use config::{ServiceConfig, MAX_ARCHIVE_BYTES};
pub use request::{SubmitRequest, ValidationError};
pub use service::UploadService;
