#[tokio::main]
async fn main() -> anyhow::Result<()> {
    taskboard_common::telemetry::init_tracing();
    let config = taskboard_users::config::Config::from_env()?;
    taskboard_users::web::start_web_server(config).await
}
