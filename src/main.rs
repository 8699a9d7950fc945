use anyhow::Result;
use pdf_quiz::utils::logging;
use pdf_quiz::{App, Config, Console, HttpQuizClient};
use tokio::io::BufReader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(&config)?;
    logging::log_startup(&config);

    let backend = HttpQuizClient::new(&config)?;
    let console = Console::new(BufReader::new(tokio::io::stdin()), std::io::stdout());

    // 初始化并运行应用
    App::new(config, backend, console)?.run().await?;

    Ok(())
}
