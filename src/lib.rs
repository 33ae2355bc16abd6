//! Serves a pretrained text classification model over HTTP.

pub mod config;
pub mod device;
pub mod error;
pub mod model;
pub mod server;

pub use error::{Result, ServerError};
pub use model::{Prediction, TextClassifier};
pub use server::{create_router, AppState};
