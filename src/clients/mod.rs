pub mod memory_client;
pub mod quiz_client;

pub use memory_client::MemoryBackend;
pub use quiz_client::{HttpQuizClient, QuizBackend};
