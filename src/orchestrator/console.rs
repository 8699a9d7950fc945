//! 终端输入输出
//!
//! 负责读取命令行、把三个页面渲染成文本

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::error::{AppError, AppResult};
use crate::workflow::{QuizPhase, QuizSession, SessionCompleter, UploadStatus, UploadSubmitter};

/// 用户命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Go(String),
    File(String),
    Submit,
    Next,
    Retry,
    More,
    Restart,
    Answer(String),
    Unknown(String),
}

impl Command {
    /// 关键字模式（上传页、完成页）
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word.to_ascii_lowercase().as_str(), rest) {
            ("quit" | "exit" | "q", _) => Command::Quit,
            ("help" | "?", _) => Command::Help,
            ("go", route) if !route.is_empty() => Command::Go(route.to_string()),
            ("file", path) if !path.is_empty() => Command::File(path.to_string()),
            ("submit" | "upload", "") => Command::Submit,
            ("next", "") => Command::Next,
            ("retry", "") => Command::Retry,
            ("more" | "generate", "") => Command::More,
            ("restart", "") => Command::Restart,
            _ => Command::Unknown(line.to_string()),
        }
    }

    /// 答题模式：普通文本是答案，`:` 开头的是命令，空行忽略
    pub fn parse_answer(line: &str) -> Command {
        if line.trim().is_empty() {
            return Command::Unknown(String::new());
        }
        match line.trim_start().strip_prefix(':') {
            Some(command) => Command::parse(command),
            None => Command::Answer(line.to_string()),
        }
    }
}

/// 终端
pub struct Console<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
        }
    }

    /// 读取一行；输入结束时返回 None
    ///
    /// 可以安全地放进 `tokio::select!`
    pub async fn read_line(&mut self) -> AppResult<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    pub fn print(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.out, "{}", text)
            .and_then(|_| self.out.flush())
            .map_err(|e| AppError::file_write_failed("stdout", e))
    }

    pub fn output(&self) -> &W {
        &self.out
    }
}

// ========== 页面渲染 ==========

pub fn render_upload(view: &UploadSubmitter) -> String {
    let mut text = String::from("== Upload a PDF to generate questions ==");
    if let Some(path) = view.selected_file() {
        text.push_str(&format!("\nSelected: {}", path.display()));
    }
    match view.status() {
        UploadStatus::Idle | UploadStatus::Selecting => {}
        status => text.push_str(&format!("\nStatus: {}", status.text())),
    }
    text.push_str("\n[file <path> | submit | go <route> | quit]");
    text
}

pub fn render_quiz(view: &QuizSession) -> String {
    match view.phase() {
        QuizPhase::Loading => "Loading questions...".to_string(),
        QuizPhase::Unavailable { .. } => {
            "Could not load questions. [:retry | :go /upload | :quit]".to_string()
        }
        QuizPhase::NoContent(_) => format!(
            "No questions available for section {}. [:go /upload | :quit]",
            view.section()
        ),
        QuizPhase::Active(active) => {
            let mut text = String::new();
            if let (Some((current, total)), Some(question)) =
                (view.progress(), view.current_question())
            {
                text.push_str(&format!(
                    "Question {} of {}\n{}",
                    current, total, question.question
                ));
            }
            if let Some(feedback) = &active.feedback {
                text.push_str(&format!("\n{}", feedback));
            }
            text.push_str("\n[type your answer | :next | :quit]");
            text
        }
        QuizPhase::Exhausted => "Section finished.".to_string(),
    }
}

pub fn render_finish(view: &SessionCompleter) -> String {
    let mut text = format!("You've completed {} questions!", view.completed());
    if let Some(status) = view.status() {
        text.push_str(&format!("\n{}", status));
    }
    text.push_str("\n[more | restart | quit]");
    text
}
