use tracing_subscriber::EnvFilter;

use nuumi::cli::Flags;
use nuumi::controllers::{execute, Session};
use nuumi::error::NuumiError;
use nuumi::models::Config;

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "nuumi=info".into()))
        .init();

    if let Err(e) = run(Flags::from_args()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(flags: Flags) -> Result<(), NuumiError> {
    let config_path = match &flags.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)?;

    let mut session = Session::open(&config)?;
    let result = execute(&mut session, flags.command);
    session.close().await;

    println!("{}", result?);
    Ok(())
}
