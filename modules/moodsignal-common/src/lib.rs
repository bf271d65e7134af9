pub mod config;
pub mod error;
pub mod questionnaire;
pub mod types;

pub use config::Config;
pub use error::MoodSignalError;
pub use questionnaire::Questionnaire;
pub use types::*;
