//! 答题页流程 - 流程层
//!
//! 状态机：
//! `Loading` → `Active(i)` → … → `Exhausted`（跳转完成页）
//!
//! 取文档失败进入 `Unavailable`，没有题目进入 `NoContent`，
//! 这两个状态与 `Loading` 是可区分的

use std::fmt;
use std::future::Future;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::QuizBackend;
use crate::error::{AppError, AppResult, DataShapeError};
use crate::models::{Question, Section};
use crate::services::DocumentService;
use crate::workflow::navigation::ViewToken;
use crate::workflow::route::Route;

/// 判题反馈
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    /// 附带原样的标准答案
    Incorrect { expected: String },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "✅ Correct!"),
            Feedback::Incorrect { expected } => {
                write!(f, "❌ Incorrect. Correct answer: {}", expected)
            }
        }
    }
}

/// 当前题目的会话状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveQuestion {
    pub index: usize,
    pub draft: String,
    pub feedback: Option<Feedback>,
}

impl ActiveQuestion {
    fn at(index: usize) -> Self {
        Self {
            index,
            ..Default::default()
        }
    }
}

/// 答题页状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Unavailable { reason: String },
    NoContent(DataShapeError),
    Active(ActiveQuestion),
    Exhausted,
}

/// 答题页控制器
#[derive(Debug)]
pub struct QuizSession {
    section: Section,
    all: Arc<[Question]>,
    range: Range<usize>,
    phase: QuizPhase,
    token: ViewToken,
}

impl QuizSession {
    pub fn new(section: Section, token: ViewToken) -> Self {
        Self {
            section,
            all: Arc::from(Vec::new()),
            range: 0..0,
            phase: QuizPhase::Loading,
            token,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, QuizPhase::Loading)
    }

    pub fn token(&self) -> &ViewToken {
        &self.token
    }

    /// 本段的题目
    pub fn questions(&self) -> &[Question] {
        &self.all[self.range.clone()]
    }

    /// 当前显示的题目，只有 Active 状态才有
    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            QuizPhase::Active(active) => self.questions().get(active.index),
            _ => None,
        }
    }

    /// (当前序号从 1 开始, 本段题数)
    pub fn progress(&self) -> Option<(usize, usize)> {
        match &self.phase {
            QuizPhase::Active(active) => Some((active.index + 1, self.questions().len())),
            _ => None,
        }
    }

    /// 取题目文档
    ///
    /// 返回的 future 不借用会话：等待期间页面可以继续渲染、读取输入，
    /// 完成后连同发起时的令牌一起交给 [`QuizSession::apply_loaded`]
    pub fn fetch<B>(
        &self,
        documents: &DocumentService<B>,
    ) -> impl Future<Output = (ViewToken, AppResult<Arc<[Question]>>)> + 'static
    where
        B: QuizBackend + Clone + 'static,
    {
        let token = self.token.clone();
        let documents = documents.clone();
        async move {
            let result = documents.questions().await;
            (token, result)
        }
    }

    /// 应用加载结果；令牌过期时丢弃并返回 false
    pub fn apply_loaded(&mut self, token: &ViewToken, result: AppResult<Arc<[Question]>>) -> bool {
        if !token.is_current() {
            debug!("答题页已离开，丢弃第 {} 段的加载结果", self.section);
            return false;
        }

        let section = self.section;
        let checked = result.and_then(|all| {
            let range = section.checked_range(all.len())?;
            Ok((all, range))
        });

        match checked {
            Ok((all, range)) => {
                info!(
                    "📝 第 {} 段: 题目 {}-{} / 共 {} 题",
                    self.section,
                    range.start + 1,
                    range.end,
                    all.len()
                );
                self.all = all;
                self.range = range;
                self.phase = QuizPhase::Active(ActiveQuestion::at(0));
            }
            Err(AppError::DataShape(reason)) => {
                warn!("⚠️ 没有可显示的题目: {}", reason);
                self.phase = QuizPhase::NoContent(reason);
            }
            Err(e) => {
                warn!("⚠️ 题目加载失败 (第 {} 段): {}", self.section, e);
                self.phase = QuizPhase::Unavailable {
                    reason: e.to_string(),
                };
            }
        }
        true
    }

    /// 回到 Loading，以便重新加载
    pub fn retry(&mut self) {
        if matches!(self.phase, QuizPhase::Unavailable { .. }) {
            self.phase = QuizPhase::Loading;
        }
    }

    /// 修改答案草稿
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let QuizPhase::Active(active) = &mut self.phase {
            active.draft = text.into();
        }
    }

    /// 判定当前草稿
    pub fn submit_answer(&mut self) -> Option<&Feedback> {
        let QuizPhase::Active(active) = &mut self.phase else {
            return None;
        };
        let question = self.all[self.range.clone()].get(active.index)?;

        let feedback = if question.check(&active.draft) {
            Feedback::Correct
        } else {
            Feedback::Incorrect {
                expected: question.answer.clone(),
            }
        };
        debug!(
            "第 {} 题判定: {}",
            self.range.start + active.index + 1,
            feedback.is_correct()
        );

        active.feedback = Some(feedback);
        active.feedback.as_ref()
    }

    /// 填写并判定答案
    pub fn answer(&mut self, text: impl Into<String>) -> Option<Feedback> {
        self.set_draft(text);
        self.submit_answer().cloned()
    }

    /// 下一题；已经是最后一题时进入 Exhausted 并返回完成页路由
    pub fn next_question(&mut self) -> Option<Route> {
        let QuizPhase::Active(active) = &self.phase else {
            return None;
        };

        let next = active.index + 1;
        if next < self.questions().len() {
            self.phase = QuizPhase::Active(ActiveQuestion::at(next));
            None
        } else {
            info!("🏁 第 {} 段完成", self.section);
            self.phase = QuizPhase::Exhausted;
            Some(Route::End {
                section: self.section,
            })
        }
    }
}
