use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use room_analyzer::ai::gemini::build_http_client;
use room_analyzer::ai::GeminiHttpClient;
use room_analyzer::analyzer::Analyzer;
use room_analyzer::models::Config;
use room_analyzer::render::{CleanupRenderer, DEFAULT_OUTPUT_PATH};
use room_analyzer::server;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "room-analyzer")]
#[command(about = "Score a room photo with Gemini and suggest how to tidy it")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the analysis endpoint over HTTP (default).
    Serve,
    /// Run one analysis and save the result as JSON.
    Analyze {
        /// Where to write the analysis result.
        #[arg(short, long, default_value = "analysis_result.json")]
        output: PathBuf,
        /// Also render a tidied-up version of the room.
        #[arg(long)]
        generate_image: bool,
        /// Where to write the rendered image.
        #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
        image_output: PathBuf,
    },
}

fn gemini_client(config: &Config) -> Result<GeminiHttpClient> {
    let client = build_http_client(config.request_timeout)
        .context("Failed to create Gemini HTTP client")?;
    Ok(
        GeminiHttpClient::new_with_client(config.api_key.clone(), config.request_timeout, client)
            .with_base_url(config.base_url.clone()),
    )
}

async fn run_server(config: Config) -> Result<()> {
    let analyzer = Analyzer::from_config(&config, gemini_client(&config)?);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    server::serve(listener, Arc::new(analyzer)).await?;
    Ok(())
}

async fn run_analysis(
    config: Config,
    output: PathBuf,
    generate_image: bool,
    image_output: PathBuf,
) -> Result<()> {
    let http = gemini_client(&config)?;
    let analyzer = Analyzer::from_config(&config, http.clone());

    info!("Step 1: Analyzing room condition...");
    let analysis = analyzer.analyze().await?;

    info!("Step 2: Saving analysis result to {}...", output.display());
    let json = serde_json::to_string_pretty(&analysis)?;
    tokio::fs::write(&output, json)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if generate_image {
        info!("Step 3: Generating cleaned image...");
        CleanupRenderer::from_config(&config, http)
            .render(&analysis, analyzer.image_path(), &image_output)
            .await?;
    }

    info!("Finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "room_analyzer=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config).await,
        Command::Analyze {
            output,
            generate_image,
            image_output,
        } => run_analysis(config, output, generate_image, image_output).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
