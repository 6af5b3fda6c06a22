use anyhow::Result;
use clap::{Parser, Subcommand};
use nextchapter::web::WebServer;
use nextchapter::{Analyzer, Config, SeedTitles};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "nextchapter")]
#[command(about = "Turn three favourite books into an interactive reading map")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the input page and analyze endpoint (default)
    Serve {
        /// Override http_server.port from config.toml
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run one analysis and write the graph document to a file
    Analyze {
        first: String,
        second: String,
        third: String,
        /// Output HTML file
        #[arg(long, default_value = "nextchapter.html")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.nextchapter.log_level.as_str()),
    )
    .init();

    match Config::locate() {
        Some(path) => log::info!("Loaded configuration from {}", path.display()),
        None => log::debug!("No config.toml found, using built-in defaults"),
    }

    // Missing credentials halt here, before any port is bound or request sent
    let api_key = match config.api_key() {
        Ok(key) => key,
        Err(e) => {
            log::error!("⚠️ Please check your API key configuration.");
            return Err(e);
        }
    };

    let analyzer = Analyzer::from_config(&config, &api_key)?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            log::info!("Starting NextChapter v{}", env!("CARGO_PKG_VERSION"));
            log::info!("Model: {}", config.gemini.model);
            let port = port.unwrap_or(config.http_server.port);
            let server = WebServer::new(Arc::new(analyzer), &config.http_server);
            server.run(port).await?;
        }
        Command::Analyze {
            first,
            second,
            third,
            out,
        } => {
            let titles = SeedTitles::new(&first, &second, &third)?;
            match analyzer.analyze(&titles).await {
                Ok(rendered) => {
                    std::fs::write(&out, &rendered.html)?;
                    println!(
                        "✅ Analysis complete! {} books, {} connections written to {}",
                        rendered.nodes,
                        rendered.edges,
                        out.display()
                    );
                }
                Err(failure) => {
                    anyhow::bail!("❌ {}", failure.message());
                }
            }
        }
    }

    Ok(())
}
