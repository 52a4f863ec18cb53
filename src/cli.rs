use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use getopts::Options;
use thiserror::Error;
use tokio::time::Duration;

use crate::source::Source;

pub const DEFAULT_FEED: &str = "articles.json";
pub const DEFAULT_RANKING: &str = "ranking_dardos_pdc_desde.xlsx";
pub const DEFAULT_AD_CLIENT: &str = "ca-pub-REPLACE_ME";
pub const DEFAULT_AD_SLOT: &str = "0000000000";

#[derive(Debug)]
pub struct Args {
    pub address: SocketAddr,
    pub content_dir: PathBuf,
    pub feed: Source,
    pub ranking: Source,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
    pub ad_client: String,
    pub ad_slots: Vec<String>,
}

#[derive(Debug)]
pub enum Command {
    Help(String),
    Run(Args),
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Options(#[from] getopts::Fail),
    #[error("Provided value for option '{option}' is invalid: {reason}")]
    Invalid { option: &'static str, reason: String },
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "d",
        "content-dir",
        "Directory that local sources are read from [Default: .]",
        "DIR",
    );
    opts.optopt(
        "f",
        "feed",
        "Path or URL of the articles and routines feed [Default: articles.json]",
        "SOURCE",
    );
    opts.optopt(
        "r",
        "ranking",
        "Path or URL of the ranking spreadsheet [Default: ranking_dardos_pdc_desde.xlsx]",
        "SOURCE",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of fetched documents [Default: false]",
    );
    opts.optopt(
        "t",
        "cache-ttl",
        "Time-to-live for cached documents [Default: 3600]",
        "SECONDS",
    );
    opts.optopt(
        "",
        "ad-client",
        "AdSense client id [Default: ca-pub-REPLACE_ME]",
        "CLIENT",
    );
    opts.optmulti(
        "",
        "ad-slot",
        "AdSense slot id, may be repeated [Default: 0000000000]",
        "SLOT",
    );
    opts
}

fn invalid<E: std::fmt::Display>(option: &'static str) -> impl FnOnce(E) -> CliError {
    move |err| CliError::Invalid {
        option,
        reason: err.to_string(),
    }
}

pub fn try_parse(args: Vec<String>) -> Result<Command, CliError> {
    let opts = opts();
    let matches = opts.parse(args)?;

    if matches.opt_present("help") {
        return Ok(Command::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    let address = matches
        .opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8080)))
        .map_err(invalid("address"))?;

    let content_dir = matches
        .opt_str("content-dir")
        .map_or_else(|| PathBuf::from("."), PathBuf::from);

    let feed = matches
        .opt_str("feed")
        .unwrap_or_else(|| DEFAULT_FEED.into())
        .parse::<Source>()
        .map_err(invalid("feed"))?;

    let ranking = matches
        .opt_str("ranking")
        .unwrap_or_else(|| DEFAULT_RANKING.into())
        .parse::<Source>()
        .map_err(invalid("ranking"))?;

    let enable_cache = matches.opt_present("enable-cache");

    let cache_ttl = matches
        .opt_get_default("cache-ttl", 3600)
        .map(Duration::from_secs)
        .map_err(invalid("cache-ttl"))?;

    let ad_client = matches
        .opt_str("ad-client")
        .unwrap_or_else(|| DEFAULT_AD_CLIENT.into());

    let mut ad_slots = matches.opt_strs("ad-slot");
    if ad_slots.is_empty() {
        ad_slots.push(DEFAULT_AD_SLOT.into());
    }

    Ok(Command::Run(Args {
        address,
        content_dir,
        feed,
        ranking,
        enable_cache,
        cache_ttl,
        ad_client,
        ad_slots,
    }))
}

pub fn parse(args: Vec<String>) -> Args {
    match try_parse(args) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
