use serde::{Deserialize, Serialize};

/// 单道题目（加载后不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
}

impl Question {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// 判断用户答案是否正确（去首尾空白、忽略大小写）
    pub fn check(&self, submitted: &str) -> bool {
        check_answer(&self.answer, submitted)
    }
}

/// 比较标准答案与用户输入
pub fn check_answer(canonical: &str, submitted: &str) -> bool {
    normalize(canonical) == normalize(submitted)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// 文档中的一个分块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionChunk {
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// 题目文档：分块的有序列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionDocument {
    pub chunks: Vec<QuestionChunk>,
}

impl QuestionDocument {
    pub fn new(chunks: Vec<QuestionChunk>) -> Self {
        Self { chunks }
    }

    /// 按文档顺序展开所有分块
    pub fn flatten(&self) -> Vec<Question> {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.questions.iter().cloned())
            .collect()
    }

    /// 题目总数
    pub fn total_questions(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.questions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_questions() == 0
    }
}

/// 上传接口的响应体
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub output_file: Option<String>,
}

/// 上传结果（HTTP 层已完成，状态码交给调用方判断）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReply {
    pub status: u16,
    pub message: Option<String>,
}

impl UploadReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_ignores_case_and_whitespace() {
        assert!(check_answer("Paris", " paris "));
        assert!(check_answer("  Mitochondria\n", "MITOCHONDRIA"));
        assert!(!check_answer("Paris", "London"));
        assert!(!check_answer("Paris", "Par is"));
    }

    #[test]
    fn test_flatten_keeps_document_order() {
        let doc = QuestionDocument::new(vec![
            QuestionChunk {
                questions: vec![Question::new("q1", "a1"), Question::new("q2", "a2")],
            },
            QuestionChunk { questions: vec![] },
            QuestionChunk {
                questions: vec![Question::new("q3", "a3")],
            },
        ]);

        let flat = doc.flatten();
        let names: Vec<&str> = flat.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(names, vec!["q1", "q2", "q3"]);
        assert_eq!(doc.total_questions(), 3);
        assert_eq!(doc.flatten(), flat);
    }

    #[test]
    fn test_upload_reply_status() {
        let ok = UploadReply {
            status: 201,
            message: None,
        };
        let busy = UploadReply {
            status: 500,
            message: Some("server busy".to_string()),
        };
        assert!(ok.is_success());
        assert!(!busy.is_success());
    }
}
