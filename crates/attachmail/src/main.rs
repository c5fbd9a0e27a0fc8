//! `attachmail` - run the attachment mailer tool from the command line.
//!
//! Credentials and servers come from the environment, falling back to a
//! JSON config file. The status string is printed to stdout; logs go to
//! stderr.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attachmail_core::{
    AttachmentRequest, Error, MailOutcome, NetworkConnector, SendEmailAttachmentTool,
    ToolDescriptor,
};

#[derive(Parser, Debug)]
#[command(name = "attachmail", version, about = "Email a file from the agent workspace")]
struct Cli {
    /// Recipient address; example@example.com saves a draft
    #[arg(long, conflicts_with_all = ["json", "describe"])]
    to: Option<String>,

    /// Subject line
    #[arg(long, conflicts_with_all = ["json", "describe"])]
    subject: Option<String>,

    /// Message body
    #[arg(long, conflicts_with_all = ["json", "describe"])]
    body: Option<String>,

    /// Name of the file to attach
    #[arg(long, conflicts_with_all = ["json", "describe"])]
    filename: Option<String>,

    /// Tool arguments as a JSON object
    #[arg(long, value_name = "ARGS", conflicts_with = "describe")]
    json: Option<String>,

    /// Print the tool descriptor and exit
    #[arg(long)]
    describe: bool,

    /// JSON config file (default: <config dir>/attachmail/config.json)
    #[arg(long, value_name = "FILE", env = "ATTACHMAIL_CONFIG")]
    config: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS", default_value_t = 120)]
    timeout_secs: u64,
}

enum Input {
    Json(String),
    Request(AttachmentRequest),
}

impl Cli {
    fn input(self) -> Result<Input> {
        if let Some(json) = self.json {
            return Ok(Input::Json(json));
        }
        match (self.to, self.subject, self.body, self.filename) {
            (Some(to), Some(subject), Some(body), Some(filename)) => {
                Ok(Input::Request(AttachmentRequest {
                    to,
                    subject,
                    body,
                    filename,
                }))
            }
            _ => bail!("--to, --subject, --body and --filename are required unless --json is given"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attachmail=info,attachmail_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.describe {
        let descriptor = serde_json::to_string_pretty(&ToolDescriptor::attachment_mailer())
            .context("Failed to serialize tool descriptor")?;
        println!("{descriptor}");
        return Ok(ExitCode::SUCCESS);
    }

    let config = settings::load(cli.config.as_deref())?;
    debug!(?config, "configuration loaded");

    let limit = Duration::from_secs(cli.timeout_secs);
    let input = cli.input()?;
    let tool = SendEmailAttachmentTool::new(config, NetworkConnector::default());

    info!("Starting attachment mailer");
    let call = async {
        match &input {
            Input::Json(args) => tool.execute_json(args.as_bytes()).await,
            Input::Request(request) => tool.execute(request).await,
        }
    };
    let status = tokio::time::timeout(limit, call)
        .await
        .unwrap_or_else(|_| MailOutcome::from(Error::Timeout(limit)).to_string());

    println!("{status}");
    Ok(if status.starts_with("Error:") {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_request() {
        let cli = Cli::try_parse_from([
            "attachmail",
            "--to",
            "a@example.org",
            "--subject",
            "s",
            "--body",
            "b",
            "--filename",
            "f.txt",
        ])
        .unwrap();
        assert_eq!(cli.timeout_secs, 120);
        let Input::Request(request) = cli.input().unwrap() else {
            panic!("expected request");
        };
        assert_eq!(request.filename, "f.txt");
    }

    #[test]
    fn json_conflicts_with_flags() {
        assert!(Cli::try_parse_from(["attachmail", "--json", "{}", "--to", "a@example.org"]).is_err());
        let cli = Cli::try_parse_from(["attachmail", "--json", "{}"]).unwrap();
        assert!(matches!(cli.input().unwrap(), Input::Json(_)));
    }

    #[test]
    fn incomplete_flags_are_rejected() {
        let cli = Cli::try_parse_from(["attachmail", "--to", "a@example.org"]).unwrap();
        assert!(cli.input().is_err());
    }
}
