use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "pdf_quiz.toml";

/// 程序配置文件
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 后端 API 配置 ---
    /// API 基础地址（健康检查也访问这个地址）
    pub api_base_url: String,
    /// 上传接口相对路径
    pub upload_path: String,
    /// 题目文档地址（http(s) 地址或本地文件路径）
    pub document_url: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 进入上传页时是否探测后端状态
    pub health_check_on_start: bool,
    // --- 运行配置 ---
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 启动时进入的路由
    pub start_route: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            upload_path: "upload".to_string(),
            document_url: "http://localhost:5173/quizData.json".to_string(),
            request_timeout_secs: 30,
            health_check_on_start: true,
            verbose_logging: false,
            output_log_file: "pdf_quiz.log".to_string(),
            start_route: "/".to_string(),
        }
    }
}

impl Config {
    /// 只从环境变量加载（缺省值取 Default）
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 先读配置文件（若存在），再用环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let path =
            std::env::var("PDF_QUIZ_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let path = Path::new(&path);
        let base = if path.exists() {
            Self::from_toml_file(path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载，缺失字段取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::Config(ConfigError::TomlParseFailed { source, .. }) => {
                AppError::Config(ConfigError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("PDF_QUIZ_API_BASE_URL").unwrap_or(self.api_base_url),
            upload_path: std::env::var("PDF_QUIZ_UPLOAD_PATH").unwrap_or(self.upload_path),
            document_url: std::env::var("PDF_QUIZ_DOCUMENT_URL").unwrap_or(self.document_url),
            request_timeout_secs: std::env::var("PDF_QUIZ_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.request_timeout_secs),
            health_check_on_start: std::env::var("PDF_QUIZ_HEALTH_CHECK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.health_check_on_start),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            start_route: std::env::var("PDF_QUIZ_START_ROUTE").unwrap_or(self.start_route),
        }
    }

    /// 上传接口完整地址
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.upload_path.trim_start_matches('/')
        )
    }

    /// 健康检查地址
    pub fn health_url(&self) -> String {
        self.api_base_url.clone()
    }
}
