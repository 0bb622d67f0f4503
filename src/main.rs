use std::path::PathBuf;

use anyhow::Result;
use exam_forge::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    // 命令行参数为待提取的文件
    let files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    // 初始化并运行应用
    App::initialize(config).await?.run(files).await?;

    Ok(())
}
