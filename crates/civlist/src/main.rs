use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};

use civlist_core::client::{MediaWikiClient, MediaWikiClientConfig, WikiWriteApi};
use civlist_core::config::{Credentials, RunConfig, load_config};
use civlist_core::run::{RunOptions, RunReport, run_pass};

#[derive(Debug, Parser)]
#[command(
    name = "civlist",
    version,
    about = "Keeps the CivWiki live server listing in sync with recent edit activity"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = "civlist.toml",
        help = "Optional [wiki] endpoint config file"
    )]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Reclassify servers and publish the summary page")]
    Run(RunArgs),
    #[command(about = "Read-only pass: print the summary without logging in or editing")]
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    #[arg(long, help = "Skip every wiki edit, print what the run would do")]
    dry_run: bool,
    #[arg(long, help = "Print the run report as JSON")]
    json: bool,
}

#[derive(Debug, Args)]
struct PreviewArgs {
    #[arg(long, help = "Print the run report as JSON")]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run(args)) => run_command(&cli.config, args.dry_run, args.json),
        Some(Commands::Preview(args)) => run_command(&cli.config, true, args.json),
        None => {
            let mut command = Cli::command();
            command.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn run_command(config_path: &Path, dry_run: bool, json: bool) -> Result<()> {
    let wiki_config = load_config(config_path)?;
    let mut run_config = RunConfig::from_env();
    if dry_run {
        run_config.should_edit_pages = false;
    }

    let mut client = MediaWikiClient::new(MediaWikiClientConfig::from_config(&wiki_config))?;
    if !dry_run {
        let credentials = Credentials::from_env()?;
        client.login(&credentials.username, &credentials.password)?;
    }

    let report = run_pass(&mut client, &run_config, &RunOptions { dry_run })?;
    print_report(&report, json)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("run summary");
    println!("live_servers: {}", report.live_servers.len());
    println!("inactive_servers: {}", report.inactive_servers.len());
    println!("moved_to_live: {}", format_names(&report.moved_to_live));
    println!(
        "moved_to_inactive: {}",
        format_names(&report.moved_to_inactive)
    );
    println!("report_title: {}", report.report_title);
    println!("published: {}", format_flag(report.published));
    println!("api_requests: {}", report.request_count);
    Ok(())
}

fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        "<none>".to_string()
    } else {
        names.join(", ")
    }
}

fn format_flag(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
