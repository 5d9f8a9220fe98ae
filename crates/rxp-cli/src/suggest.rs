//! `suggest` command: a line-oriented typeahead client.
//!
//! Each stdin line is a new prefix. A lookup only fires after the prefix has
//! stayed current for [`QUIET_PERIOD`], and only the newest lookup's result
//! is printed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rxp_core::{RequestSequencer, Ticket};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

pub(crate) const QUIET_PERIOD: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Suggestion {
    pub rx_cui: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Vec<Suggestion>,
}

/// GET the autocomplete route for `prefix`.
pub(crate) async fn fetch_suggestions(
    client: &reqwest::Client,
    server: &str,
    prefix: &str,
) -> anyhow::Result<Vec<Suggestion>> {
    let url = format!("{}/api/v1/drugs/autocomplete", server.trim_end_matches('/'));
    let envelope: Envelope = client
        .get(url)
        .query(&[("q", prefix)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(envelope.data)
}

/// Wait out the quiet period, then run `fetch` if `ticket` is still the
/// newest. Returns `None` when a newer ticket was issued either before the
/// fetch started or while it was in flight.
pub(crate) async fn debounced<T, F, Fut>(
    sequencer: &RequestSequencer,
    ticket: Ticket,
    quiet: Duration,
    fetch: F,
) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    tokio::time::sleep(quiet).await;
    if !sequencer.is_latest(ticket) {
        return None;
    }
    let value = fetch().await;
    sequencer.accept(ticket, value)
}

pub(crate) async fn run_suggest(server: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let sequencer = Arc::new(RequestSequencer::new());
    let server: Arc<str> = Arc::from(server);

    eprintln!("type a drug name prefix per line; ctrl-d to quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let prefix = line.trim().to_string();
        let ticket = sequencer.issue();
        let sequencer = Arc::clone(&sequencer);
        let client = client.clone();
        let server = Arc::clone(&server);

        pending.push(tokio::spawn(async move {
            let result = debounced(&sequencer, ticket, QUIET_PERIOD, || async {
                fetch_suggestions(&client, &server, &prefix).await
            })
            .await;

            match result {
                Some(Ok(suggestions)) => print_suggestions(&prefix, &suggestions),
                Some(Err(e)) => {
                    tracing::warn!(prefix = %prefix, error = %e, "autocomplete request failed");
                }
                None => {
                    tracing::debug!(prefix = %prefix, ticket = ticket.value(), "superseded");
                }
            }
        }));
        pending.retain(|handle| !handle.is_finished());
    }

    for handle in pending {
        handle.await?;
    }
    Ok(())
}

fn print_suggestions(prefix: &str, suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("{prefix}: no matches");
        return;
    }
    for s in suggestions {
        println!("{prefix}: {} ({})", s.name, s.rx_cui);
    }
}
