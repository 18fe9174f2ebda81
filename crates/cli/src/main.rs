// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod timeline;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use conftrack::{EditSession, State};
use conftrack_domain::{Clock, FixedClock, SystemClock};
use conftrack_persistence::{InMemoryStore, ReconcileReport, submit_edit};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

/// Conference timeline tools
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Validate the research phases of a conference snapshot
    #[command(visible_alias = "v")]
    Validate {
        /// Conference state JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Evaluate windows at this RFC 3339 instant instead of now
        #[arg(long, value_parser = parse_instant)]
        now: Option<OffsetDateTime>,
    },

    /// Print every window, round and submission of a conference snapshot
    #[command(visible_alias = "t")]
    Timeline {
        /// Conference state JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Evaluate windows at this RFC 3339 instant instead of now
        #[arg(long, value_parser = parse_instant)]
        now: Option<OffsetDateTime>,
    },

    /// Submit an edit session to a JSON-backed store
    #[command(visible_alias = "r")]
    Reconcile {
        /// Store JSON file; a missing file is an empty store
        #[arg(long)]
        store: PathBuf,

        /// Edit session JSON file
        #[arg(short, long)]
        draft: PathBuf,

        /// Save the store and the refreshed session back to their files
        #[arg(short, long)]
        write: bool,
    },
}

fn parse_instant(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339)
}

fn clock(now: Option<OffsetDateTime>) -> Box<dyn Clock> {
    now.map_or_else(
        || Box::new(SystemClock) as Box<dyn Clock>,
        |at| Box::new(FixedClock::new(at)),
    )
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents: String = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("Failed to parse {}", path.display()))
}

impl Command {
    async fn run(self) -> Result<()> {
        match self {
            Self::Validate { snapshot, now } => {
                let state: State = read_json(&snapshot).await?;
                let now: OffsetDateTime = clock(now).now();
                let (lines, problems) = timeline::validation_lines(&state, now);
                print_lines(&lines);
                if problems > 0 {
                    return Err(eyre!("{problems} timeline problem(s) found"));
                }
                Ok(())
            }
            Self::Timeline { snapshot, now } => {
                let state: State = read_json(&snapshot).await?;
                print_lines(&timeline::timeline_lines(&state, clock(now).now()));
                Ok(())
            }
            Self::Reconcile {
                store,
                draft,
                write,
            } => reconcile(&store, &draft, write).await,
        }
    }
}

async fn reconcile(store_path: &Path, draft_path: &Path, write: bool) -> Result<()> {
    let store: InMemoryStore = InMemoryStore::load(store_path)
        .await
        .wrap_err("Failed to load store")?;
    let mut session: EditSession = read_json(draft_path).await?;
    let mut state: State = State::new(session.conference_id.clone());

    let report: ReconcileReport = submit_edit(&mut session, &mut state, &store)
        .await
        .wrap_err("Submit failed")?;
    print_lines(&timeline::report_lines(&report));

    if write {
        store
            .save(store_path)
            .await
            .wrap_err("Failed to save store")?;
        let contents: String = serde_json::to_string_pretty(&session)?;
        tokio::fs::write(draft_path, contents)
            .await
            .wrap_err_with(|| format!("Failed to write {}", draft_path.display()))?;
        info!(
            store = %store_path.display(),
            draft = %draft_path.display(),
            "Wrote refreshed store and session"
        );
    }

    if !report.is_success() {
        return Err(eyre!(
            "{} operation(s) failed; deletions that failed stay pending",
            report.failures.len()
        ));
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(args.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    if let Err(err) = args.command.run().await {
        error!("{err:#}");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use conftrack::ConferenceDraft;
    use conftrack_domain::Sponsor;
    use time::macros::datetime;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("conftrack-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_parse_instant() {
        assert_eq!(
            parse_instant("2026-03-05T12:00:00Z").unwrap(),
            datetime!(2026-03-05 12:00 UTC)
        );
        assert!(parse_instant("March 5th").is_err());
    }

    #[test]
    fn test_args_parse_reconcile() {
        let args = Args::try_parse_from([
            "conftrack",
            "reconcile",
            "--store",
            "store.json",
            "--draft",
            "draft.json",
            "--write",
        ])
        .unwrap();

        assert!(matches!(
            args.command,
            Command::Reconcile { write: true, .. }
        ));
    }

    #[test]
    fn test_fixed_clock_from_now_flag() {
        assert_eq!(
            clock(Some(datetime!(2026-03-05 0:00 UTC))).now(),
            datetime!(2026-03-05 0:00 UTC)
        );
    }

    #[tokio::test]
    async fn test_reconcile_writes_store_and_session() {
        let store_path = temp_path("store.json");
        let draft_path = temp_path("draft.json");
        let session = EditSession {
            draft: ConferenceDraft {
                sponsors: vec![Sponsor {
                    name: String::from("ACME"),
                    ..Sponsor::default()
                }],
                ..ConferenceDraft::default()
            },
            ..EditSession::create("conf-2026")
        };
        tokio::fs::write(&draft_path, serde_json::to_string(&session).unwrap())
            .await
            .unwrap();

        reconcile(&store_path, &draft_path, true).await.unwrap();

        let refreshed: EditSession = read_json(&draft_path).await.unwrap();
        assert!(refreshed.draft.sponsors[0].id.is_persisted());
        assert!(!refreshed.is_dirty());

        // A second run against the saved store has nothing to do
        reconcile(&store_path, &draft_path, false).await.unwrap();

        tokio::fs::remove_file(&store_path).await.unwrap();
        tokio::fs::remove_file(&draft_path).await.unwrap();
    }
}
