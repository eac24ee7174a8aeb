use clap::Parser;

use wordaudio::config::{Cli, EnvSettings, RunConfig};
use wordaudio::{logger, pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Инициализируем логгер до любого вывода
    logger::init_logger();

    let cli = Cli::parse();
    let config = RunConfig::resolve(cli, EnvSettings::from_env())?;

    // Ошибки отдельных задач попадают в отчет, а не сюда
    let report = pipeline::run(&config).await?;
    report.print();

    Ok(())
}
