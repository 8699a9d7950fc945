//! 完成页流程
//!
//! 重新上传，或者按总题数循环进入下一段

use tracing::{debug, info, warn};

use crate::clients::QuizBackend;
use crate::models::{Section, SECTION_SIZE};
use crate::services::DocumentService;
use crate::workflow::navigation::ViewToken;
use crate::workflow::route::Route;

pub const NO_QUESTIONS: &str = "No questions available yet. Upload a PDF first.";
pub const LOAD_FAILED: &str = "Could not load questions. Please try again.";

/// 完成页控制器
#[derive(Debug)]
pub struct SessionCompleter {
    section: Section,
    completed: usize,
    status: Option<String>,
    token: ViewToken,
}

impl SessionCompleter {
    pub fn new(section: Section, token: ViewToken) -> Self {
        Self {
            section,
            completed: SECTION_SIZE,
            status: None,
            token,
        }
    }

    /// 记录刚完成的题目数（直接打开完成页时默认为一整段）
    pub fn with_completed(mut self, completed: usize) -> Self {
        self.completed = completed;
        self
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// 重新上传，不发请求
    pub fn restart(&self) -> Route {
        Route::Upload
    }

    /// 生成更多题目：循环进入下一段
    ///
    /// # 返回
    /// 没有题目或加载失败时返回 None，并设置状态文本
    pub async fn generate_more<B: QuizBackend>(
        &mut self,
        documents: &DocumentService<B>,
    ) -> Option<Route> {
        let token = self.token.clone();
        let result = documents.total_questions().await;

        if !token.is_current() {
            debug!("完成页已离开，丢弃题目总数");
            return None;
        }

        let total = match result {
            Ok(total) => total,
            Err(e) => {
                warn!("⚠️ 获取题目总数失败: {}", e);
                self.status = Some(LOAD_FAILED.to_string());
                return None;
            }
        };

        match self.section.next(total) {
            Some(next) => {
                info!("➡️ 共 {} 题, 第 {} 段 → 第 {} 段", total, self.section, next);
                self.status = None;
                Some(Route::Questions { section: next })
            }
            None => {
                warn!("⚠️ 题目文档为空，停留在完成页");
                self.status = Some(NO_QUESTIONS.to_string());
                None
            }
        }
    }
}
