use crate::error::{AppError, AppResult};
use crate::models::question::QuestionDocument;
use std::path::Path;
use tokio::fs;

/// 从 JSON 文本解析题目文档
pub fn parse_document(content: &str) -> AppResult<QuestionDocument> {
    let document: QuestionDocument = serde_json::from_str(content)?;
    Ok(document)
}

/// 从本地 JSON 文件加载题目文档
pub async fn load_document_file(path: &Path) -> AppResult<QuestionDocument> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let document = parse_document(&content)?;

    tracing::info!(
        "成功加载 {} 个分块, {} 个题目: {}",
        document.chunks.len(),
        document.total_questions(),
        path.display()
    );

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileError;

    const SAMPLE: &str = r#"[
        {"chunk": 1, "questions": [
            {"question": "What is a cell?", "answer": "The basic unit of life"},
            {"question": "Define osmosis.", "answer": "Diffusion of water"}
        ]},
        {"chunk": 2, "questions": [
            {"question": "What is chlorophyll?", "answer": "A green pigment"}
        ]}
    ]"#;

    #[test]
    fn test_parse_document_ignores_extra_fields() {
        let doc = parse_document(SAMPLE).unwrap();
        assert_eq!(doc.chunks.len(), 2);
        assert_eq!(doc.total_questions(), 3);
        assert_eq!(doc.flatten()[2].answer, "A green pigment");
    }

    #[test]
    fn test_parse_document_rejects_non_array() {
        let err = parse_document(r#"{"questions": []}"#).unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_load_document_file() {
        let path =
            std::env::temp_dir().join(format!("pdf_quiz_loader_{}.json", std::process::id()));
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let doc = load_document_file(&path).await.unwrap();
        assert_eq!(doc.total_questions(), 3);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_document_file(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }
}
