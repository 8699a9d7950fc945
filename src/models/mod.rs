pub mod loaders;
pub mod question;
pub mod section;

pub use loaders::{load_document_file, parse_document};
pub use question::{
    check_answer, Question, QuestionChunk, QuestionDocument, UploadReply, UploadResponse,
};
pub use section::{total_sections, Section, SECTION_SIZE};
