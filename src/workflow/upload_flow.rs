//! 上传页流程
//!
//! 选择 PDF → 提交 → 成功后进入第 0 段答题

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::clients::QuizBackend;
use crate::error::{AppError, TransportError, ValidationError};
use crate::models::Section;
use crate::workflow::navigation::ViewToken;
use crate::workflow::route::Route;

pub const UPLOAD_COMPLETE: &str = "Upload complete!";
pub const UPLOAD_SERVER_ERROR: &str = "Upload failed (server error).";
pub const UPLOAD_NETWORK_ERROR: &str = "Upload failed (network error).";
pub const UPLOAD_BAD_RESPONSE: &str = "Upload failed (invalid server response).";
pub const UPLOAD_READ_ERROR: &str = "Upload failed (could not read file).";

/// 上传状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Selecting,
    Submitting,
    Success(String),
    Error(String),
}

impl UploadStatus {
    /// 显示给用户的状态文本
    pub fn text(&self) -> &str {
        match self {
            UploadStatus::Idle | UploadStatus::Selecting => "",
            UploadStatus::Submitting => "Uploading...",
            UploadStatus::Success(message) | UploadStatus::Error(message) => message,
        }
    }
}

/// 上传页控制器
#[derive(Debug)]
pub struct UploadSubmitter {
    file: Option<PathBuf>,
    status: UploadStatus,
    token: ViewToken,
}

impl UploadSubmitter {
    pub fn new(token: ViewToken) -> Self {
        Self {
            file: None,
            status: UploadStatus::Idle,
            token,
        }
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// 选择文件，只接受 .pdf
    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            debug!("已选择文件: {}", path.display());
            self.file = Some(path);
            self.status = UploadStatus::Selecting;
        } else {
            let err = ValidationError::NotPdf {
                path: path.display().to_string(),
            };
            self.file = None;
            self.status = UploadStatus::Error(err.to_string());
        }
    }

    /// 提交文件
    ///
    /// # 返回
    /// 上传成功时返回要跳转的路由；失败只更新状态文本
    pub async fn submit<B: QuizBackend>(&mut self, backend: &B) -> Option<Route> {
        let Some(path) = self.file.clone() else {
            self.status = UploadStatus::Error(ValidationError::NoFileSelected.to_string());
            return None;
        };

        self.status = UploadStatus::Submitting;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("读取文件失败 {}: {}", path.display(), e);
                self.status = UploadStatus::Error(UPLOAD_READ_ERROR.to_string());
                return None;
            }
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());

        info!("📤 正在上传: {} ({} 字节)", file_name, bytes.len());
        let token = self.token.clone();
        let result = backend.upload_pdf(file_name, bytes).await;

        if !token.is_current() {
            debug!("上传页已离开，丢弃上传结果");
            return None;
        }

        match result {
            Ok(reply) if reply.is_success() => {
                let message = reply.message.unwrap_or_else(|| UPLOAD_COMPLETE.to_string());
                info!("✓ 上传成功: {}", message);
                self.status = UploadStatus::Success(message);
                Some(Route::Questions {
                    section: Section::FIRST,
                })
            }
            Ok(reply) => {
                warn!("⚠️ 上传失败, 状态码 {}: {:?}", reply.status, reply.message);
                self.status = UploadStatus::Error(
                    reply
                        .message
                        .unwrap_or_else(|| UPLOAD_SERVER_ERROR.to_string()),
                );
                None
            }
            Err(AppError::Transport(TransportError::JsonParseFailed { source })) => {
                warn!("⚠️ 上传响应无法解析: {}", source);
                self.status = UploadStatus::Error(UPLOAD_BAD_RESPONSE.to_string());
                None
            }
            Err(e) => {
                warn!("⚠️ 上传请求失败: {}", e);
                self.status = UploadStatus::Error(UPLOAD_NETWORK_ERROR.to_string());
                None
            }
        }
    }
}

/// 探测后端状态，只记录日志
pub async fn probe_health<B: QuizBackend>(backend: &B) {
    match backend.health_check().await {
        Ok(status) => info!("🩺 后端在线: {}", status),
        Err(e) => warn!("🩺 后端状态检查失败: {}", e),
    }
}
