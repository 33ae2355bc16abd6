pub mod handlers;
pub mod router;
pub mod state;

pub use handlers::{ClassifyResponse, PredictRequest, PredictResponse};
pub use router::create_router;
pub use state::AppState;
