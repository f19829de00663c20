use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::engine::{AutoOptions, Scraper};
use crate::events::{LogSink, ScrapeEvent};
use crate::host::{Host, Reply, Request};
use crate::page::{RevealOn, SimPage};
use crate::profiles::{Profile, ProfileKind};
use crate::tools::assemble::Record;
use crate::tools::export::{self, ExportFormat};
use crate::ApiResponse;

#[derive(Parser)]
#[command(name = "scrollscrape", version, about = "Incremental record extraction from result pages (JSON/CSV)")]
pub struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// One pass over the first capture; no pagination
    Static(StaticArgs),
    /// Scan, reveal more and repeat until full, stalled or interrupted
    Auto(AutoArgs),
    /// Answer JSON-lines requests on stdin; responses and events go to stdout
    Serve(ServeArgs),
    #[command(subcommand)]
    Profile(ProfileCmd),
}

#[derive(Subcommand)]
enum ProfileCmd {
    /// Print a built-in profile as an editable JSON scaffold
    Show {
        #[arg(value_enum)]
        kind: ProfileKind,
    },
    /// Validate a profile file
    Check { path: PathBuf },
}

#[derive(Args)]
struct SourceArgs {
    /// Saved HTML captures, one frame per file, in reveal order
    #[arg(required = true)]
    pages: Vec<PathBuf>,
    #[arg(long, value_enum, default_value_t = ProfileKind::People)]
    profile: ProfileKind,
    /// Custom profile JSON; overrides --profile
    #[arg(long)]
    profile_file: Option<PathBuf>,
    /// Interaction that reveals the next capture
    #[arg(long, value_enum, default_value_t = RevealOn::Click)]
    reveal: RevealOn,
    /// URL the captures were taken from, for resolving relative links
    #[arg(long)]
    base_url: Option<Url>,
}

#[derive(Args)]
struct OutputArgs {
    /// Emit raw records instead of the JSON envelope
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,
    /// Write records to a file; format follows the extension unless --format is set
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct StaticArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long)]
    limit: Option<usize>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct AutoArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[arg(long)]
    limit: Option<usize>,
    /// Base wait between reveal and rescan
    #[arg(long)]
    wait_ms: Option<u64>,
    /// Empty scans before giving up
    #[arg(long)]
    stall_after: Option<usize>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    source: SourceArgs,
}

impl SourceArgs {
    fn load(&self) -> crate::Result<(SimPage, Profile)> {
        let profile = match &self.profile_file {
            Some(path) => Profile::from_file(path)?,
            None => Profile::builtin(self.profile),
        };
        let mut page = SimPage::from_files(self.pages.as_slice(), self.reveal)?;
        if let Some(url) = &self.base_url {
            page = page.with_url(url.clone());
        }
        Ok((page, profile))
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    match cli.cmd {
        Command::Static(args) => static_cmd(args).await,
        Command::Auto(args) => auto_cmd(args).await,
        Command::Serve(args) => serve_cmd(args).await,
        Command::Profile(pc) => profile_cmd(pc),
    }
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scrollscrape=info".parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

async fn static_cmd(args: StaticArgs) -> anyhow::Result<()> {
    let (page, profile) = match args.source.load() {
        Ok(v) => v,
        Err(e) => return finish::<()>(Err(e)),
    };
    let limit = args.limit.filter(|&n| n > 0).unwrap_or(profile.default_limit);
    let columns = profile.columns();
    let mut scraper = Scraper::new(page, profile);

    match scraper.scrape_static(limit).await {
        Ok(records) if wants_export(&args.output) => export_records(&records, &columns, &args.output),
        res => finish(res.map(|records| Reply::Static {
            mode: "static",
            count: records.len(),
            records,
        })),
    }
}

async fn auto_cmd(args: AutoArgs) -> anyhow::Result<()> {
    let (page, profile) = match args.source.load() {
        Ok(v) => v,
        Err(e) => return finish::<()>(Err(e)),
    };
    let columns = profile.columns();
    let mut opts = AutoOptions {
        limit: args.limit,
        wait_ms: args.wait_ms,
        ..AutoOptions::default()
    };
    if let Some(n) = args.stall_after {
        opts.stall_after = n;
    }

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, finishing current scan");
                cancel.cancel();
            }
        })
    };

    let mut scraper = Scraper::new(page, profile);
    let res = scraper.scrape_auto(&opts, &cancel, &LogSink).await;
    interrupt.abort();

    match res {
        Ok(outcome) if wants_export(&args.output) => export_records(&outcome.records, &columns, &args.output),
        res => finish(res),
    }
}

async fn serve_cmd(args: ServeArgs) -> anyhow::Result<()> {
    let (page, profile) = args.source.load()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ScrapeEvent>();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let host = Arc::new(Host::install(page, profile, Arc::new(event_tx)));

    let events_out = out_tx.clone();
    let forward = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            send_line(&events_out, &event);
        }
    });
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut inflight = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                tracing::debug!(?request, "request");
                let received = host.receive(request);
                let host = host.clone();
                let out = out_tx.clone();
                inflight.push(tokio::spawn(async move {
                    let response = host.run(received).await;
                    send_line(&out, &response);
                }));
            }
            Err(e) => send_line(&out_tx, &ApiResponse::<()>::err(format!("invalid request: {e}"))),
        }
    }

    for task in inflight {
        task.await?;
    }
    // Dropping the host closes the event channel, which ends the forwarder.
    drop(host);
    forward.await?;
    drop(out_tx);
    writer.await??;
    Ok(())
}

fn profile_cmd(pc: ProfileCmd) -> anyhow::Result<()> {
    match pc {
        ProfileCmd::Show { kind } => {
            println!("{}", serde_json::to_string_pretty(&Profile::builtin(kind))?);
            Ok(())
        }
        ProfileCmd::Check { path } => finish(Profile::from_file(&path).map(|p| {
            serde_json::json!({ "name": p.name, "columns": p.columns() })
        })),
    }
}

fn wants_export(output: &OutputArgs) -> bool {
    output.format.is_some() || output.out.is_some()
}

fn export_records(records: &[Record], columns: &[String], output: &OutputArgs) -> anyhow::Result<()> {
    match &output.out {
        Some(path) => {
            let format = output.format.unwrap_or_else(|| {
                match path.extension().and_then(|e| e.to_str()) {
                    Some("csv") => ExportFormat::Csv,
                    _ => ExportFormat::Json,
                }
            });
            finish(
                export::write_file(path, records, columns, format)
                    .map(|_| serde_json::json!({ "out": path, "count": records.len() })),
            )
        }
        None => {
            let format = output.format.unwrap_or_default();
            println!("{}", export::render(records, columns, format)?);
            Ok(())
        }
    }
}

fn send_line<T: serde::Serialize>(out: &mpsc::UnboundedSender<String>, value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => {
            let _ = out.send(line);
        }
        Err(e) => tracing::warn!(error = %e, "unserializable message dropped"),
    }
}

fn finish<T: serde::Serialize>(res: crate::Result<T>) -> anyhow::Result<()> {
    match res {
        Ok(v) => print_json(ApiResponse::ok(v)),
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}

fn print_json<T: serde::Serialize>(val: T) -> anyhow::Result<()> {
    // pretty JSON output
    println!("{}", serde_json::to_string_pretty(&val)?);
    Ok(())
}
