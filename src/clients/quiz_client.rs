/// 题目后端 API 客户端
///
/// 封装所有与上传服务、题目文档相关的调用逻辑
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{
    load_document_file, parse_document, QuestionDocument, UploadReply, UploadResponse,
};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// 上传文件时使用的表单字段名
pub const UPLOAD_FIELD: &str = "pdf";

/// 后端能力：取文档、上传 PDF、健康检查
///
/// 所有返回的 future 都是 Send，便于 `tokio::spawn`
pub trait QuizBackend: Send + Sync {
    /// 题目文档地址（缓存键）
    fn document_url(&self) -> &str;

    /// 获取题目文档
    fn fetch_document(&self) -> impl Future<Output = AppResult<QuestionDocument>> + Send;

    /// 上传 PDF，HTTP 状态码原样返回给调用方
    fn upload_pdf(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> impl Future<Output = AppResult<UploadReply>> + Send;

    /// 探测后端状态
    fn health_check(&self) -> impl Future<Output = AppResult<Value>> + Send;
}

/// 基于 reqwest 的后端客户端
#[derive(Clone, Debug)]
pub struct HttpQuizClient {
    http: reqwest::Client,
    upload_url: String,
    health_url: String,
    document_url: String,
}

impl HttpQuizClient {
    /// 创建新的后端客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            upload_url: config.upload_url(),
            health_url: config.health_url(),
            document_url: config.document_url.clone(),
        })
    }

    /// 文档地址是否需要走 HTTP
    fn is_remote(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }

    async fn fetch_remote_document(&self) -> AppResult<QuestionDocument> {
        debug!("GET {}", self.document_url);

        let response = self
            .http
            .get(&self.document_url)
            .send()
            .await
            .map_err(|e| AppError::request_failed(&self.document_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::bad_status(&self.document_url, status.as_u16(), None));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::request_failed(&self.document_url, e))?;

        parse_document(&body)
    }
}

impl QuizBackend for HttpQuizClient {
    fn document_url(&self) -> &str {
        &self.document_url
    }

    async fn fetch_document(&self) -> AppResult<QuestionDocument> {
        if Self::is_remote(&self.document_url) {
            self.fetch_remote_document().await
        } else {
            let path = self
                .document_url
                .strip_prefix("file://")
                .unwrap_or(&self.document_url);
            load_document_file(Path::new(path)).await
        }
    }

    async fn upload_pdf(&self, file_name: String, bytes: Vec<u8>) -> AppResult<UploadReply> {
        debug!("POST {} ({} 字节, 文件: {})", self.upload_url, bytes.len(), file_name);

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::request_failed(&self.upload_url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::request_failed(&self.upload_url, e))?;

        debug!("上传结果: {} {}", status, body);

        let message = if status.is_success() {
            let parsed = serde_json::from_str::<UploadResponse>(&body)?;
            if let Some(output_file) = &parsed.output_file {
                info!("📄 后端已生成题目文件: {}", output_file);
            }
            parsed.message
        } else {
            // 失败响应的 body 不一定是 JSON
            serde_json::from_str::<UploadResponse>(&body)
                .ok()
                .and_then(|r| r.message)
        };

        Ok(UploadReply {
            status: status.as_u16(),
            message,
        })
    }

    async fn health_check(&self) -> AppResult<Value> {
        let response = self
            .http
            .get(&self.health_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::request_failed(&self.health_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::bad_status(&self.health_url, status.as_u16(), None));
        }

        Ok(response.json::<Value>().await?)
    }
}
