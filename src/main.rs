use anyhow::{bail, Result};
use bevy_attendee_import::models::{fetch_google_sheet, load_csv_file};
use bevy_attendee_import::{logger, App, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    // 加载参会人名单（本地 CSV 优先，其次在线表格）
    let attendees = if !config.csv_path.is_empty() {
        info!("📁 正在解析 CSV 文件: {}", config.csv_path);
        load_csv_file(&config.csv_path).await?
    } else if !config.sheet_url.is_empty() {
        info!("🌐 正在拉取在线表格: {}", config.sheet_url);
        fetch_google_sheet(&config.sheet_url).await?
    } else {
        bail!("必须设置 CSV_PATH 或 GOOGLE_SHEET_URL 其中之一");
    };

    info!("📊 共解析出 {} 条参会人记录", attendees.len());
    for (i, a) in attendees.iter().enumerate() {
        info!(
            "  {}. {} ({}) - 签到: {}",
            i + 1,
            a.full_name(),
            a.email,
            if a.checked_in { "是" } else { "否" }
        );
    }

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    let _result = app.run(attendees).await?;

    Ok(())
}
