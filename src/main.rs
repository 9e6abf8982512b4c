use anyhow::Result;
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use proxy_spray::{
    input::flatten_tokens,
    scan::{self, Dispatcher, HeaderParser, Reporter},
    ScanConfig, ScanError,
};
use std::io;
use std::process;
use std::time::Duration;

/// Exit code for configuration errors
const CONFIG_ERROR_EXIT: i32 = 2;

const BANNER: &str = r"
  _ \                      __|
  __/ _| _ \ \ \ /  |  | \__ \  _ \   _| _` |  |  |
 _|  _| \___/  _\_\ \_, | ____/ .__/ _| \__,_| \_, |
                    ___/       _|              ___/
";

/// Determine if an upstream HTTP/S proxy will send requests to an upstream target
#[derive(Parser)]
#[command(name = "proxy-spray")]
#[command(version)]
#[command(about = "Determine if an upstream HTTP/S proxy will send requests to an upstream target")]
struct Cli {
    /// Proxies to attempt in URL format (scheme://host:port), or files of them
    #[arg(short = 'p', long, required = true, num_args = 1..)]
    proxy_urls: Vec<String>,

    /// Upstream targets: URLs, IPv4 addresses, CIDR ranges, or files of them
    #[arg(short = 't', long, required = true, num_args = 1..)]
    targets: Vec<String>,

    /// Do not add an https:// target for bare IPs and CIDR hosts
    #[arg(long)]
    no_assume_https: bool,

    /// Do not add an http:// target for bare IPs and CIDR hosts
    #[arg(long)]
    no_assume_http: bool,

    /// Number of concurrent workers
    #[arg(short = 'n', long, default_value = "4")]
    process_count: usize,

    /// Timeout in seconds for each request
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Display failed requests as well
    #[arg(short = 'd', long)]
    display_failures: bool,

    /// Extra headers sent with every request ('Name: value'), or files of them
    #[arg(short = 'H', long, num_args = 1..)]
    http_headers: Vec<String>,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli);

    eprintln!("{}", BANNER);

    match run(cli).await {
        Err(e) if is_configuration_error(&e) => {
            error!("{}", e);
            process::exit(CONFIG_ERROR_EXIT);
        }
        other => other,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let headers = HeaderParser::load(&flatten_tokens(&cli.http_headers));

    let config = ScanConfig::new()
        .with_proxies(flatten_tokens(&cli.proxy_urls))
        .with_targets(flatten_tokens(&cli.targets))
        .with_headers(headers.items)
        .with_assume_http(!cli.no_assume_http)
        .with_assume_https(!cli.no_assume_https)
        .with_concurrency(cli.process_count)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_display_failures(cli.display_failures);
    config.validate()?;

    let work = scan::prepare(&config)?;

    let dispatcher = Dispatcher::new(&config);
    let shutdown = dispatcher.shutdown_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, waiting for in-flight requests");
            shutdown.trigger();
        }
    });

    if !config.display_failures {
        info!("Failed requests will not be displayed");
    }

    let mut reporter = Reporter::new(io::stdout(), config.display_failures);
    let stats = scan::execute(&dispatcher, work, &mut reporter).await?;
    interrupt.abort();

    if stats.undispatched > 0 {
        warn!("{} work items were never sent", stats.undispatched);
    }

    reporter.finish()?;
    info!("Execution complete");

    Ok(())
}

fn is_configuration_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<ScanError>()
        .map_or(false, ScanError::is_fatal)
}

fn init_logger(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter_module("proxy_spray", level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}
