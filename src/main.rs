use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use unitrack::cli::{Cli, Command};
use unitrack::commands::{run_chart, run_top};
use unitrack::config::AppConfig;
use unitrack::data::SubgraphClient;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Chart(args) => {
            let config = AppConfig::from_env(&args.out_dir)?;
            let client = SubgraphClient::from_config(&config);
            run_chart(
                &client,
                &config,
                &args,
                Utc::now(),
                Local::now().date_naive(),
                &mut stdout,
            )
            .await?;
        }
        Command::Top(args) => {
            let config = AppConfig::from_env(std::path::Path::new("."))?;
            let client = SubgraphClient::from_config(&config);
            run_top(&client, &args, Utc::now(), &mut stdout).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
