use anyhow::Result;
use std::io::Write;
use tokio::io::AsyncBufRead;
use tracing::{info, warn};

use crate::clients::QuizBackend;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::Section;
use crate::orchestrator::console::{render_finish, render_quiz, render_upload, Command, Console};
use crate::services::DocumentService;
use crate::utils::truncate_text;
use crate::workflow::{
    probe_health, Navigator, QuizPhase, QuizSession, Route, SessionCompleter, UploadSubmitter,
};

/// 页面退出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewExit {
    Navigate(Route),
    Quit,
}

/// 加载过程中先返回的一方
enum LoadRace<T> {
    Loaded(T),
    Input(AppResult<Option<String>>),
}

/// 应用主结构
pub struct App<B, R, W> {
    config: Config,
    documents: DocumentService<B>,
    navigator: Navigator,
    console: Console<R, W>,
    last_completed: Option<usize>,
}

impl<B, R, W> App<B, R, W>
where
    B: QuizBackend + Clone + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// 初始化应用
    pub fn new(config: Config, backend: B, console: Console<R, W>) -> AppResult<Self> {
        let start = Route::parse(&config.start_route)?;

        Ok(Self {
            config,
            documents: DocumentService::new(backend),
            navigator: Navigator::new(start),
            console,
            last_completed: None,
        })
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn console(&self) -> &Console<R, W> {
        &self.console
    }

    /// 运行应用主逻辑，直到用户退出或输入结束
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let exit = match self.navigator.current() {
                Route::Upload => self.upload_view().await?,
                Route::Questions { section } => self.quiz_view(section).await?,
                Route::End { section } => self.finish_view(section).await?,
            };

            match exit {
                ViewExit::Navigate(route) => self.navigator.navigate(route),
                ViewExit::Quit => break,
            }
        }

        info!("👋 程序退出");
        Ok(())
    }

    // ========== 上传页 ==========

    async fn upload_view(&mut self) -> AppResult<ViewExit> {
        let mut view = UploadSubmitter::new(self.navigator.token());

        if self.config.health_check_on_start {
            let backend = self.documents.backend().clone();
            tokio::spawn(async move { probe_health(&backend).await });
        }

        self.console.print(&render_upload(&view))?;

        loop {
            let Some(line) = self.console.read_line().await? else {
                return Ok(ViewExit::Quit);
            };

            match Command::parse(&line) {
                Command::File(path) => view.select_file(path),
                Command::Submit => {
                    if let Some(route) = view.submit(self.documents.backend()).await {
                        // 新上传的 PDF 会生成新的文档
                        self.documents.invalidate();
                        self.console.print(&render_upload(&view))?;
                        return Ok(ViewExit::Navigate(route));
                    }
                }
                other => {
                    if let Some(exit) = self.common_command(other)? {
                        return Ok(exit);
                    }
                    continue;
                }
            }

            self.console.print(&render_upload(&view))?;
        }
    }

    // ========== 答题页 ==========

    async fn quiz_view(&mut self, section: Section) -> AppResult<ViewExit> {
        let mut view = QuizSession::new(section, self.navigator.token());

        loop {
            if view.is_loading() {
                self.console.print(&render_quiz(&view))?;

                // 每次进入 Loading 只发起一次请求；输入不会打断它，离开页面时随之丢弃
                let load = view.fetch(&self.documents);
                tokio::pin!(load);

                loop {
                    let race = tokio::select! {
                        biased;
                        loaded = &mut load => LoadRace::Loaded(loaded),
                        line = self.console.read_line() => LoadRace::Input(line),
                    };

                    match race {
                        LoadRace::Loaded((token, result)) => {
                            view.apply_loaded(&token, result);
                            self.log_current_question(&view);
                            self.console.print(&render_quiz(&view))?;
                            break;
                        }
                        LoadRace::Input(line) => {
                            let Some(line) = line? else {
                                return Ok(ViewExit::Quit);
                            };
                            match Command::parse_answer(&line) {
                                // 题目还没出来，答案无处可交
                                Command::Answer(_) => {}
                                other => {
                                    if let Some(exit) = self.common_command(other)? {
                                        return Ok(exit);
                                    }
                                }
                            }
                        }
                    }
                }
                continue;
            }

            let Some(line) = self.console.read_line().await? else {
                return Ok(ViewExit::Quit);
            };

            match Command::parse_answer(&line) {
                Command::Answer(text) => {
                    view.answer(text);
                }
                Command::Next => {
                    if let Some(route) = view.next_question() {
                        self.last_completed = Some(view.questions().len());
                        return Ok(ViewExit::Navigate(route));
                    }
                    self.log_current_question(&view);
                }
                Command::Retry => {
                    view.retry();
                    continue;
                }
                other => {
                    if let Some(exit) = self.common_command(other)? {
                        return Ok(exit);
                    }
                    continue;
                }
            }

            self.console.print(&render_quiz(&view))?;
        }
    }

    fn log_current_question(&self, view: &QuizSession) {
        if let (Some((current, total)), Some(question)) =
            (view.progress(), view.current_question())
        {
            info!(
                "❓ 第 {} 段 {}/{}: {}",
                view.section(),
                current,
                total,
                truncate_text(&question.question, 60)
            );
        } else if let QuizPhase::NoContent(reason) = view.phase() {
            info!("第 {} 段无内容: {}", view.section(), reason);
        }
    }

    // ========== 完成页 ==========

    async fn finish_view(&mut self, section: Section) -> AppResult<ViewExit> {
        let mut view = SessionCompleter::new(section, self.navigator.token());
        if let Some(completed) = self.last_completed.take() {
            view = view.with_completed(completed);
        }

        self.console.print(&render_finish(&view))?;

        loop {
            let Some(line) = self.console.read_line().await? else {
                return Ok(ViewExit::Quit);
            };

            match Command::parse(&line) {
                Command::Restart => return Ok(ViewExit::Navigate(view.restart())),
                Command::More => {
                    if let Some(route) = view.generate_more(&self.documents).await {
                        return Ok(ViewExit::Navigate(route));
                    }
                }
                other => {
                    if let Some(exit) = self.common_command(other)? {
                        return Ok(exit);
                    }
                    continue;
                }
            }

            self.console.print(&render_finish(&view))?;
        }
    }

    // ========== 通用命令 ==========

    /// 处理各页面通用的命令；返回 Some 表示离开当前页面
    fn common_command(&mut self, command: Command) -> AppResult<Option<ViewExit>> {
        match command {
            Command::Quit => Ok(Some(ViewExit::Quit)),
            Command::Go(target) => match Route::parse(&target) {
                Ok(route) => Ok(Some(ViewExit::Navigate(route))),
                Err(e) => {
                    warn!("⚠️ {}", e);
                    self.console.print(&format!("Unknown route: {}", target))?;
                    Ok(None)
                }
            },
            Command::Unknown(text) if text.is_empty() => Ok(None),
            Command::Help | Command::Unknown(_) => {
                self.console.print(
                    "Routes: /upload, /questions?section=N, /end?section=N (go <route>). \
                     Type quit to exit.",
                )?;
                Ok(None)
            }
            _ => {
                self.console.print("That command is not available here.")?;
                Ok(None)
            }
        }
    }
}
