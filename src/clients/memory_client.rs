/// 内存后端
///
/// 不访问网络，用于离线演示和测试。记录每类请求的调用次数
use crate::clients::quiz_client::QuizBackend;
use crate::error::{AppError, AppResult};
use crate::models::{QuestionDocument, UploadReply};
use serde_json::{json, Value};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const MEMORY_URL: &str = "memory://quizData.json";

#[derive(Debug)]
struct Inner {
    document: Mutex<QuestionDocument>,
    upload_reply: Mutex<Option<UploadReply>>,
    fetch_fails: bool,
    fetch_delay: Option<Duration>,
    fetch_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    health_calls: AtomicUsize,
}

/// 内存后端（克隆后共享同一份状态和计数）
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

impl MemoryBackend {
    /// 创建新的内存后端，上传默认返回 200
    pub fn new(document: QuestionDocument) -> Self {
        Self::build(document, false, None)
    }

    /// 取文档总是失败的后端
    pub fn failing() -> Self {
        Self::build(QuestionDocument::default(), true, None)
    }

    /// 取文档前等待一段时间（需在设置上传返回之前调用）
    pub fn with_fetch_delay(self, delay: Duration) -> Self {
        Self::build(self.document(), self.inner.fetch_fails, Some(delay))
    }

    fn build(document: QuestionDocument, fetch_fails: bool, fetch_delay: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(Inner {
                document: Mutex::new(document),
                upload_reply: Mutex::new(Some(UploadReply {
                    status: 200,
                    message: None,
                })),
                fetch_fails,
                fetch_delay,
                fetch_calls: AtomicUsize::new(0),
                upload_calls: AtomicUsize::new(0),
                health_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// 设置上传接口的返回；None 表示网络错误
    pub fn set_upload_reply(&self, reply: Option<UploadReply>) {
        *self.inner.upload_reply.lock().unwrap_or_else(|e| e.into_inner()) = reply;
    }

    /// 替换文档（模拟后端重新生成题目）
    pub fn set_document(&self, document: QuestionDocument) {
        *self.inner.document.lock().unwrap_or_else(|e| e.into_inner()) = document;
    }

    pub fn document(&self) -> QuestionDocument {
        self.inner.document.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.inner.upload_calls.load(Ordering::SeqCst)
    }

    pub fn health_calls(&self) -> usize {
        self.inner.health_calls.load(Ordering::SeqCst)
    }

    /// 所有网络请求次数
    pub fn network_calls(&self) -> usize {
        self.fetch_calls() + self.upload_calls() + self.health_calls()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(QuestionDocument::default())
    }
}

impl QuizBackend for MemoryBackend {
    fn document_url(&self) -> &str {
        MEMORY_URL
    }

    async fn fetch_document(&self) -> AppResult<QuestionDocument> {
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.inner.fetch_delay {
            tokio::time::sleep(delay).await;
        }

        if self.inner.fetch_fails {
            return Err(AppError::request_failed(
                MEMORY_URL,
                io::Error::new(io::ErrorKind::ConnectionRefused, "backend offline"),
            ));
        }

        Ok(self.document())
    }

    async fn upload_pdf(&self, _file_name: String, _bytes: Vec<u8>) -> AppResult<UploadReply> {
        self.inner.upload_calls.fetch_add(1, Ordering::SeqCst);

        let reply = self
            .inner
            .upload_reply
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        match reply {
            Some(reply) => Ok(reply),
            None => Err(AppError::request_failed(
                "memory://api/upload",
                io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
            )),
        }
    }

    async fn health_check(&self) -> AppResult<Value> {
        self.inner.health_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({ "status": "ok" }))
    }
}
