use pdf_quiz::models::{QuestionChunk, UploadReply};
use pdf_quiz::{
    App, AppError, Config, Console, MemoryBackend, Question, QuestionDocument, Route, Section,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;

/// 构造 n 道题，分成每块 4 题
fn document(n: usize) -> QuestionDocument {
    let questions: Vec<Question> = (0..n)
        .map(|i| Question::new(format!("Question {}", i), format!("Answer {}", i)))
        .collect();
    QuestionDocument::new(
        questions
            .chunks(4)
            .map(|chunk| QuestionChunk {
                questions: chunk.to_vec(),
            })
            .collect(),
    )
}

fn config(start_route: &str) -> Config {
    Config {
        start_route: start_route.to_string(),
        health_check_on_start: false,
        ..Default::default()
    }
}

async fn temp_pdf(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}_{}.pdf", name, std::process::id()));
    tokio::fs::write(&path, b"%PDF-1.4\n%%EOF\n").await.unwrap();
    path
}

/// 用脚本输入跑一遍应用，返回 (最终路由, 终端输出)
async fn run_script(backend: MemoryBackend, config: Config, script: &str) -> (Route, String) {
    let console = Console::new(script.as_bytes(), Vec::new());
    let mut app = tokio_test::assert_ok!(App::new(config, backend, console));
    app.run().await.expect("运行失败");

    let output = String::from_utf8(app.console().output().clone()).unwrap();
    (app.navigator().current(), output)
}

#[tokio::test]
async fn test_submit_without_file_makes_no_network_calls() {
    let backend = MemoryBackend::new(document(25));
    let (route, output) = run_script(backend.clone(), config("/"), "submit\nquit\n").await;

    assert_eq!(route, Route::Upload);
    assert!(output.contains("Status: Please select a file first."));
    assert_eq!(backend.network_calls(), 0);
}

#[tokio::test]
async fn test_upload_server_busy_keeps_upload_view() {
    let backend = MemoryBackend::new(document(25));
    backend.set_upload_reply(Some(UploadReply {
        status: 500,
        message: Some("server busy".to_string()),
    }));
    let pdf = temp_pdf("it_busy").await;

    let script = format!("file {}\nsubmit\nquit\n", pdf.display());
    let (route, output) = run_script(backend.clone(), config("/upload"), &script).await;

    assert_eq!(route, Route::Upload);
    assert!(output.contains("Status: server busy"));
    assert_eq!(backend.upload_calls(), 1);
    assert_eq!(backend.fetch_calls(), 0);
}

#[tokio::test]
async fn test_upload_then_first_section() {
    let backend = MemoryBackend::new(document(25));
    backend.set_upload_reply(Some(UploadReply {
        status: 200,
        message: Some("Processed 'cells.pdf' successfully.".to_string()),
    }));
    let pdf = temp_pdf("it_ok").await;

    let script = format!("file {}\nsubmit\nquit\n", pdf.display());
    let (route, output) = run_script(backend.clone(), config("/"), &script).await;

    assert_eq!(route, Route::Questions { section: Section(0) });
    assert!(output.contains("Status: Processed 'cells.pdf' successfully."));
    assert!(output.contains("Question 1 of 10\nQuestion 0"));
}

#[tokio::test]
async fn test_full_section_then_generate_more() {
    let backend = MemoryBackend::new(document(25));

    let mut script = String::from(" answer 0 \nLondon\n");
    script.push_str(&":next\n".repeat(10));
    script.push_str("more\nquit\n");

    let (route, output) =
        run_script(backend.clone(), config("/questions?section=0"), &script).await;

    assert!(output.contains("✅ Correct!"));
    assert!(output.contains("❌ Incorrect. Correct answer: Answer 0"));
    assert!(output.contains("Question 10 of 10\nQuestion 9"));
    assert!(output.contains("You've completed 10 questions!"));
    assert!(output.contains("Question 1 of 10\nQuestion 10"));
    assert_eq!(route, Route::Questions { section: Section(1) });
    // 完成页复用了答题页加载的文档
    assert_eq!(backend.fetch_calls(), 1);
}

#[tokio::test]
async fn test_partial_last_section() {
    let backend = MemoryBackend::new(document(25));
    let script = format!("{}quit\n", ":next\n".repeat(5));

    let (route, output) = run_script(backend, config("/questions?section=2"), &script).await;

    assert!(output.contains("Question 1 of 5\nQuestion 20"));
    assert!(output.contains("You've completed 5 questions!"));
    assert_eq!(route, Route::End { section: Section(2) });
}

#[tokio::test]
async fn test_generate_more_wraps_to_first_section() {
    let backend = MemoryBackend::new(document(25));
    let (route, _) = run_script(backend, config("/end?section=2"), "more\nquit\n").await;

    assert_eq!(route, Route::Questions { section: Section(0) });
}

#[tokio::test]
async fn test_generate_more_without_questions_stays() {
    let backend = MemoryBackend::new(document(0));
    let (route, output) = run_script(backend, config("/end?section=0"), "more\nquit\n").await;

    assert_eq!(route, Route::End { section: Section(0) });
    assert!(output.contains("No questions available yet."));
}

#[tokio::test]
async fn test_restart_returns_to_upload() {
    let backend = MemoryBackend::new(document(25));
    let (route, _) = run_script(backend.clone(), config("/end?section=1"), "restart\nquit\n").await;

    assert_eq!(route, Route::Upload);
    assert_eq!(backend.network_calls(), 0);
}

#[tokio::test]
async fn test_section_out_of_range_renders_no_content() {
    let backend = MemoryBackend::new(document(25));
    let (route, output) = run_script(
        backend,
        config("/questions?section=9"),
        "some answer\n:next\nquit\n",
    )
    .await;

    assert!(output.contains("No questions available for section 9."));
    assert_eq!(route, Route::Questions { section: Section(9) });
}

#[tokio::test]
async fn test_fetch_failure_is_recoverable() {
    let backend = MemoryBackend::failing();
    let (route, output) = run_script(
        backend.clone(),
        config("/questions"),
        ":retry\n:go /upload\nquit\n",
    )
    .await;

    assert!(output.contains("Could not load questions."));
    assert_eq!(route, Route::Upload);
    assert_eq!(backend.fetch_calls(), 2);
}

#[tokio::test]
async fn test_unknown_route_is_ignored() {
    let backend = MemoryBackend::new(document(3));
    let (route, output) = run_script(backend, config("/"), "go /about\nquit\n").await;

    assert!(output.contains("Unknown route: /about"));
    assert_eq!(route, Route::Upload);
}

#[tokio::test]
async fn test_leaving_while_loading_drops_the_load() {
    let backend = MemoryBackend::new(document(25)).with_fetch_delay(Duration::from_millis(200));
    let (route, output) = run_script(
        backend,
        config("/questions?section=0"),
        ":go /upload\nquit\n",
    )
    .await;

    assert_eq!(route, Route::Upload);
    assert!(output.contains("Loading questions..."));
    assert!(!output.contains("Question 1 of"));
}

#[tokio::test]
async fn test_typing_while_loading_keeps_one_fetch() {
    let backend = MemoryBackend::new(document(25)).with_fetch_delay(Duration::from_millis(200));
    let (route, output) = run_script(
        backend.clone(),
        config("/questions?section=0"),
        "x\n\n:next\nx\n:quit\n",
    )
    .await;

    assert_eq!(route, Route::Questions { section: Section(0) });
    assert!(!output.contains("Incorrect"));
    assert_eq!(backend.fetch_calls(), 1);
}

#[tokio::test]
async fn test_load_finishes_after_input_during_loading() {
    let backend = MemoryBackend::new(document(25)).with_fetch_delay(Duration::from_millis(50));
    // 加载期间先到一行输入，等加载完成后再答题
    let input = tokio_test::io::Builder::new()
        .read(b"early guess\n")
        .wait(Duration::from_millis(300))
        .read(b"answer 0\n:quit\n")
        .build();

    let console = Console::new(BufReader::new(input), Vec::new());
    let app = App::new(config("/questions?section=0"), backend.clone(), console);
    let mut app = tokio_test::assert_ok!(app);
    app.run().await.expect("运行失败");
    let output = String::from_utf8(app.console().output().clone()).unwrap();

    assert_eq!(backend.fetch_calls(), 1);
    assert!(output.contains("Question 1 of 10\nQuestion 0"));
    assert!(output.contains("✅ Correct!"));
    assert!(!output.contains("Incorrect"));
}

#[tokio::test]
async fn test_blank_answer_is_not_graded() {
    let backend = MemoryBackend::new(document(3));
    let (_, output) = run_script(backend, config("/questions?section=0"), "\n   \n:quit\n").await;

    assert!(output.contains("Question 1 of 3"));
    assert!(!output.contains("Incorrect"));
    assert!(!output.contains("Correct!"));
}

#[test]
fn test_invalid_start_route() {
    let console = Console::new("".as_bytes(), Vec::new());
    let result = App::new(config("/about"), MemoryBackend::default(), console);
    assert!(matches!(result, Err(AppError::Config(_))));
}

/// 需要本地运行上传服务和题目文档：cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn test_live_upload() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let backend = pdf_quiz::HttpQuizClient::new(&config).expect("创建客户端失败");
    let mut view = pdf_quiz::UploadSubmitter::new(pdf_quiz::workflow::ViewToken::detached());
    view.select_file(temp_pdf("it_live").await);

    let route = view.submit(&backend).await;
    println!("上传状态: {}", view.status().text());
    assert_eq!(route, Some(Route::Questions { section: Section(0) }));
}
