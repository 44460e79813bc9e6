pub mod error;
pub mod logger;
pub mod preflight;
pub mod validation;
