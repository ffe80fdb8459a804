#[tokio::main]
async fn main() -> anyhow::Result<()> {
    taskboard_common::telemetry::init_tracing();
    let config = taskboard_tasks::config::Config::from_env()?;
    taskboard_tasks::web::start_web_server(config).await
}
