use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 本地校验错误（不会发起网络请求）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 网络 / 响应错误
    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),
    /// 题目数据形状错误
    #[error("数据错误: {0}")]
    DataShape(#[from] DataShapeError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 本地校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 未选择文件
    #[error("Please select a file first.")]
    NoFileSelected,
    /// 不是 PDF 文件
    #[error("Only PDF files are supported.")]
    NotPdf { path: String },
}

/// 传输错误
#[derive(Debug, Error)]
pub enum TransportError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回非成功状态码
    #[error("服务端返回错误状态 ({endpoint}): {status}, message={message:?}")]
    BadStatus {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 题目数据形状错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataShapeError {
    /// 文档中没有任何题目
    #[error("题目文档为空")]
    EmptyDocument,
    /// 请求的分段超出范围
    #[error("分段 {section} 超出范围 (共 {total_sections} 段)")]
    SectionOutOfRange { section: usize, total_sections: usize },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 非法路由
    #[error("无法识别的路由: {route}")]
    InvalidRoute { route: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        AppError::Transport(TransportError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Transport(TransportError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::TomlParseFailed {
            path: String::new(), // TOML错误不包含路径信息
            source: err,
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: err,
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建请求失败错误
    pub fn request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Transport(TransportError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建状态码错误
    pub fn bad_status(endpoint: impl Into<String>, status: u16, message: Option<String>) -> Self {
        AppError::Transport(TransportError::BadStatus {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为网络层面的错误
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
