pub mod finish_flow;
pub mod navigation;
pub mod quiz_flow;
pub mod route;
pub mod upload_flow;

pub use finish_flow::SessionCompleter;
pub use navigation::{Navigator, ViewToken};
pub use quiz_flow::{ActiveQuestion, Feedback, QuizPhase, QuizSession};
pub use route::Route;
pub use upload_flow::{probe_health, UploadStatus, UploadSubmitter};
