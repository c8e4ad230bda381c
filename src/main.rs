use slotwatch::cli::watch_commands::{run, Cli};
use slotwatch::config::Settings;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = match Settings::new(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {:?}", e);
            std::process::exit(1);
        }
    };

    info!("Loaded configuration: {:?}", settings);

    if let Err(e) = run(cli.command, settings).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
