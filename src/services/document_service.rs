//! 题目文档服务 - 业务能力层
//!
//! 只负责"拿到展开后的题目序列"能力，按文档地址缓存

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::clients::QuizBackend;
use crate::error::AppResult;
use crate::models::question::Question;

/// 题目文档服务
///
/// 职责：
/// - 通过后端获取题目文档并展开
/// - 同一地址只请求一次，直到被 invalidate
/// - 不关心分段和答题流程
#[derive(Clone)]
pub struct DocumentService<B> {
    backend: B,
    cache: Arc<Mutex<HashMap<String, Arc<[Question]>>>>,
}

impl<B: QuizBackend> DocumentService<B> {
    /// 创建新的文档服务
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 获取展开后的题目序列
    pub async fn questions(&self) -> AppResult<Arc<[Question]>> {
        let url = self.backend.document_url().to_string();

        if let Some(cached) = self.cached(&url) {
            debug!("命中题目缓存: {} ({} 题)", url, cached.len());
            return Ok(cached);
        }

        let document = self.backend.fetch_document().await?;
        let questions: Arc<[Question]> = document.flatten().into();

        info!("📚 已加载题目文档: {} ({} 题)", url, questions.len());

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url, questions.clone());

        Ok(questions)
    }

    /// 题目总数
    pub async fn total_questions(&self) -> AppResult<usize> {
        Ok(self.questions().await?.len())
    }

    /// 丢弃缓存（上传新 PDF 后文档会被重新生成）
    pub fn invalidate(&self) {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if cache.remove(self.backend.document_url()).is_some() {
            debug!("题目缓存已清除: {}", self.backend.document_url());
        }
    }

    fn cached(&self, url: &str) -> Option<Arc<[Question]>> {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(url)
            .cloned()
    }
}
