use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use parlscraper::{
    fetch::{self, PortraitNames},
    members::{self, Member},
    report::{self, Composition, MemberRow, ReportConfig},
};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

#[derive(Parser)]
#[command(
    name = "parlscraper",
    about = "Scrape the House of Commons member directory and report its composition"
)]
struct Cli {
    /// Member directory page
    #[arg(long, default_value = fetch::SEARCH_URL)]
    url: Url,

    /// Directory for the workbook, document, snapshot and portraits
    #[arg(short, long, default_value = "parliament")]
    out_dir: PathBuf,

    /// Report date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Build reports from a saved members snapshot instead of scraping
    #[arg(long)]
    from_json: Option<PathBuf>,

    /// Skip downloading and embedding portraits
    #[arg(long)]
    no_portraits: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) configure ────────────────────────────────────────────────
    let cli = Cli::parse();
    let cfg = ReportConfig::new(
        cli.out_dir,
        cli.date.unwrap_or_else(|| Local::now().date_naive()),
    );
    info!(date = %cfg.date_str(), out_dir = %cfg.out_dir.display(), "startup");
    cfg.ensure_out_dir()?;

    let client = fetch::client()?;

    // ─── 3) members: scrape or reload ────────────────────────────────
    let members: Vec<Member> = match &cli.from_json {
        Some(path) => {
            let members = members::load_snapshot(path)?;
            info!(count = members.len(), path = %path.display(), "loaded snapshot");
            members
        }
        None => {
            let html = fetch::fetch_listing(&client, &cli.url).await?;
            fetch::parse_members(&html, &cli.url)?
        }
    };
    if members.is_empty() {
        warn!(url = %cli.url, "no members found; reports will be empty");
    }
    members::save_snapshot(&cfg.snapshot_path(), &members)?;
    info!(path = %cfg.snapshot_path().display(), "wrote snapshot");

    // ─── 4) portraits, one at a time ─────────────────────────────────
    let mut rows = Vec::with_capacity(members.len());
    let mut names = PortraitNames::new();
    for member in &members {
        let portrait = if cli.no_portraits {
            None
        } else {
            let file_name = names.claim(member);
            match fetch::download_portrait(&client, member, cfg.portrait_dir(), &file_name).await {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(name = %member.fullname, error = %e, "portrait download failed");
                    None
                }
            }
        };
        rows.push(MemberRow { member, portrait });
    }

    // ─── 5) reports ──────────────────────────────────────────────────
    report::write_members_workbook(&cfg.workbook_path(), cfg.date, &rows)?;

    let composition =
        Composition::from_members(&members).context("tabulating member composition")?;
    report::write_composition_document(&cfg.document_path(), cfg.date, &composition)?;

    info!("all done");
    Ok(())
}
