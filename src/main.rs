//! unified-search: command line front end
//!
//! Runs one search against the configured account and prints the merged
//! result list.

use anyhow::{bail, Result};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use unified_search::{
    activation::{ResourceOpener, SyncFolderResolver},
    config,
    network::HttpClient,
    results::ResultType,
    search::SessionState,
    Account, SearchSession, UnifiedSearchModel,
};
use url::Url;

/// Prints what would be opened instead of launching a viewer
struct StdoutOpener;

impl ResourceOpener for StdoutOpener {
    fn open_url(&self, url: &Url) -> io::Result<()> {
        println!("open {}", url);
        Ok(())
    }

    fn open_local(&self, path: &Path) -> io::Result<()> {
        println!("open {}", path.display());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("-h") | Some("--help") => {
            print_usage();
            return Ok(());
        }
        Some("-V") | Some("--version") => {
            println!("unified-search {}", unified_search::VERSION);
            return Ok(());
        }
        _ => {}
    }
    let term = args.join(" ");
    if term.trim().is_empty() {
        print_usage();
        return Ok(());
    }

    let settings = config::load()?;
    let account = Arc::new(Account::from_settings(&settings.account)?);
    info!("Searching as {} on {}", account.user(), account.server_url());

    let client = HttpClient::with_settings(account.clone(), &settings.outgoing)?;
    let model = UnifiedSearchModel::new(account, &settings.search);
    let (session, handle) = SearchSession::spawn(
        model,
        Arc::new(client),
        Arc::new(SyncFolderResolver::new(settings.sync_folders.clone())),
        Arc::new(StdoutOpener),
    );

    let mut events = session.subscribe();
    session.set_search_term(term)?;

    // discovery plus one round of provider searches
    let deadline = Duration::from_millis(settings.search.debounce_ms)
        + Duration::from_secs_f64(settings.outgoing.request_timeout * 2.0)
        + Duration::from_secs(1);

    let mut state = SessionState::default();
    let mut started = false;
    let settled = tokio::time::timeout(deadline, async {
        loop {
            match events.recv().await {
                Ok(event) => state.apply(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Skipped {} session events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => bail!("search session ended unexpectedly"),
            }

            started |= state.search_in_progress;
            let failed = !state.error_string.is_empty();
            if !state.search_in_progress && (started || failed) {
                return Ok(());
            }
        }
    })
    .await;

    match settled {
        Ok(result) => result?,
        Err(_) => warn!("Search did not finish within {:?}", deadline),
    }

    print_results(&session);
    if !state.error_string.is_empty() {
        eprint!("{}", state.error_string);
    }

    session.shutdown()?;
    handle.await?;
    Ok(())
}

fn print_results(session: &SearchSession) {
    let rows = session.results().snapshot();
    if rows.is_empty() {
        println!("No results");
        return;
    }

    for row in rows {
        match row.result_type {
            ResultType::CategorySeparator => println!("== {} ==", row.provider_name),
            ResultType::FetchMoreTrigger => println!("   ... more results available"),
            ResultType::Default if row.subline.is_empty() => {
                println!("   {}  <{}>", row.title, row.resource_url)
            }
            ResultType::Default => {
                println!("   {} ({})  <{}>", row.title, row.subline, row.resource_url)
            }
        }
    }
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
unified-search v{}
Search every provider of a collaboration server at once

USAGE:
    unified-search [OPTIONS] <TERM>...

OPTIONS:
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    UNIFIED_SEARCH_SETTINGS_PATH   Path to settings.yml
    UNIFIED_SEARCH_SERVER_URL      Server base URL
    UNIFIED_SEARCH_USER            Account user name
    UNIFIED_SEARCH_APP_PASSWORD    App password for basic auth
    UNIFIED_SEARCH_DEBOUNCE_MS     Quiet period before searching
    RUST_LOG                       Log filter (default: warn)
"#,
        unified_search::VERSION
    );
}
