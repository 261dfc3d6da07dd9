use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use bilisummary::common::banner::{BannerInfo, print_banner};
use bilisummary::common::http::{HttpClient, HttpTransport};
use bilisummary::common::logger;
use bilisummary::common::shutdown::run_until_interrupted;
use bilisummary::common::types::AnyResult;
use bilisummary::configs::Config;
use bilisummary::report::{render_text, write_report};
use bilisummary::SummaryGateway;
use clap::{ArgAction, Parser};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "bilisummary", version)]
#[command(about = "Fetch the AI-generated summary and subtitles of a Bilibili video")]
struct Cli {
    /// SESSDATA cookie of a logged-in account
    sessdata: Option<String>,

    /// Video id (BV...)
    video_id: Option<String>,

    /// Also write the report to a file (true/false)
    #[arg(action = ArgAction::Set)]
    file_output: Option<bool>,

    /// Show timestamps in the report (true/false)
    #[arg(action = ArgAction::Set)]
    time_detail: Option<bool>,

    /// Path to a TOML config file (defaults to config.toml, then config.default.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for report files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Skip the startup banner
    #[arg(long)]
    no_banner: bool,
}

impl Cli {
    /// Loads the config file, which is optional only when both the session
    /// credential and the video id were given on the command line.
    fn load_config(&self) -> AnyResult<Config> {
        let mut config = match (&self.config, Config::find()) {
            (Some(path), _) => Config::load_from(path)?,
            (None, Some(path)) => Config::load_from(path)?,
            (None, None) if self.sessdata.is_some() && self.video_id.is_some() => {
                Config::default()
            }
            (None, None) => return Err("config.toml or config.default.toml not found".into()),
        };

        if let Some(sessdata) = &self.sessdata {
            config.bilibili.sessdata = Some(sessdata.clone());
        }
        if let Some(video_id) = &self.video_id {
            config.bilibili.video_id = Some(video_id.clone());
        }
        if let Some(file_output) = self.file_output {
            config.output.file_output = file_output;
        }
        if let Some(time_detail) = self.time_detail {
            config.output.time_detail = time_detail;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logger::init(config.logging.as_ref());
    if !cli.no_banner {
        print_banner(&BannerInfo::default());
    }

    info!("Starting Bilibili AI summary client...");
    match run(&config, cli.json).await {
        Ok(()) => {
            info!("Application execution completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Application execution failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config, json: bool) -> AnyResult<()> {
    let (credential, video_id) = config.validate()?;
    info!(
        "Configuration loaded successfully - SESSDATA: {}, VideoId: {}, Time Detail: {}, File Output: {}",
        credential.masked(),
        video_id,
        config.output.time_detail,
        config.output.file_output
    );

    let user_agent = config.http.user_agent();
    let client = HttpClient::new(&user_agent, config.http.timeout())?;
    let gateway =
        SummaryGateway::new(Arc::new(HttpTransport::new(client))).with_user_agent(user_agent);

    let summary = gateway.get_summary(&video_id, &credential);
    let result = run_until_interrupted(summary, tokio::signal::ctrl_c())
        .await
        .ok_or("interrupted before the summary arrived")?
        .inspect_err(|e| {
            if e.is_auth() {
                warn!("SESSDATA was rejected; log in again and supply a fresh cookie value");
            }
        })?;

    if result.is_empty() {
        warn!("No summary data retrieved for {}", video_id);
        return Ok(());
    }
    info!("AI summary retrieved successfully");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_text(&result, config.output.time_detail));
    }

    if config.output.file_output {
        let path = write_report(
            &config.output.directory,
            &video_id,
            &result,
            config.output.time_detail,
        )
        .await?;
        info!("Report saved: {}", path.display());
    }

    Ok(())
}
