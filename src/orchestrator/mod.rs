//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责页面调度和终端交互，是整个客户端的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用主循环
//! - 持有导航器、文档服务和终端
//! - 根据当前路由挂载对应页面，页面退出后执行导航
//! - 上传页挂载时发起健康检查（只记日志）
//!
//! ### `console` - 终端
//! - 读取命令、渲染页面文本
//!
//! ## 层次关系
//!
//! ```text
//! app (路由循环)
//!     ↓
//! workflow::{UploadSubmitter, QuizSession, SessionCompleter} (单个页面)
//!     ↓
//! services::DocumentService (题目缓存)
//!     ↓
//! clients::QuizBackend (HTTP / 内存)
//! ```

pub mod app;
pub mod console;

// 重新导出主要类型
pub use app::App;
pub use console::{Command, Console};
