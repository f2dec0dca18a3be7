//! Example: run one scan from the terminal, without the desktop app.
//!
//! Uses the same configuration as the app (`GMAIL_CREDENTIALS_FILE`,
//! `OPENAI_API_KEY`, ...) and always runs in preview mode, so nothing is
//! moved to Trash.
//!
//! ## Running
//!
//! ```bash
//! export GMAIL_CREDENTIALS_FILE=./credentials.json
//! cargo run -p inboxsweep-core --example headless_scan -- INBOX 10 0.6
//! ```
//!
//! Arguments are optional: label, limit, threshold.

use std::env;

use inboxsweep_core::{AppConfig, Preflight, ScanConfig, ScanReport, Scanner, SessionProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inboxsweep_core=info".into()),
        )
        .init();

    let mut args = env::args().skip(1);
    let label = args.next();
    let limit = args.next().map_or(Ok(ScanConfig::DEFAULT_LIMIT), |s| s.parse())?;
    let threshold = args
        .next()
        .map_or(Ok(ScanConfig::DEFAULT_THRESHOLD), |s| s.parse())?;
    let scan = ScanConfig::new(true, limit, label.as_deref(), threshold)?;

    let config = AppConfig::from_env()?;
    let http = reqwest::Client::new();
    let scorer = config.scorer(http.clone());

    let preflight = Preflight::check(&config, &scorer);
    println!("InboxSweep headless scan");
    println!("========================\n");
    println!("  Credentials: {}", preflight.credentials_path.display());
    println!("  Scorer:      {}", preflight.scorer_mode);
    println!("  Label:       {}", scan.label());
    println!("  Limit:       {}", scan.limit());
    println!("  Threshold:   {:.2}\n", scan.threshold());
    if let Some(instructions) = preflight.instructions() {
        println!("{instructions}");
        return Ok(());
    }

    let session = SessionProvider::new(&config, http)
        .authenticate(|url| println!("Visit this URL to authorize InboxSweep:\n\n{url}\n"))
        .await?;

    let report = Scanner::new(session.mailbox(), &scorer, &scan)
        .run(|progress| eprintln!("  [{}/{}]", progress.processed, progress.total))
        .await?;

    match &report {
        ScanReport::Empty => println!("{}", ScanReport::EMPTY_MESSAGE),
        ScanReport::Completed(reports) => {
            for message in reports {
                println!("#{} {}", message.index, message.headline());
            }
            println!("\n{}", report.summary());
        }
    }

    Ok(())
}
