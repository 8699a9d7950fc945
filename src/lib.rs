//! # PDF Quiz
//!
//! 上传 PDF、按段答题的终端客户端
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 只暴露后端能力：取文档、上传 PDF、健康检查
//! - `HttpQuizClient` - reqwest 实现
//! - `MemoryBackend` - 内存实现，记录请求次数
//!
//! ### ② 业务能力层（Services）
//! - `DocumentService` - 拿到展开后的题目序列，按地址缓存
//!
//! ### ③ 流程层（Workflow）
//! - `UploadSubmitter` - 上传页
//! - `QuizSession` - 答题页状态机（Loading → Active → Exhausted）
//! - `SessionCompleter` - 完成页，循环进入下一段
//! - `Navigator` / `ViewToken` - 导航与过期结果丢弃
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 路由循环
//! - `orchestrator/console` - 终端输入输出
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{HttpQuizClient, MemoryBackend, QuizBackend};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Question, QuestionDocument, Section};
pub use orchestrator::{App, Console};
pub use services::DocumentService;
pub use workflow::{QuizSession, Route, SessionCompleter, UploadSubmitter};
