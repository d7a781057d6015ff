use anyhow::Result;
use orrery::config::AppConfig;
use orrery::engine::EngineApp;

fn main() -> Result<()> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let mut app = EngineApp::new(config.engine, &config.solar)?;
    app.run()
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}
