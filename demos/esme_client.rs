// ABOUTME: ESME that binds to an SMSC, submits messages and prints delivery receipts
// ABOUTME: Exercises bind, request correlation, keep-alive and unbind from the command line

//! # ESME client
//!
//! ```bash
//! cargo run --example esme_client -- --system-id test --password secret \
//!   --to 447700900002 --from 447700900001 --message "Hello" --count 5
//! ```

use argh::FromArgs;
use smpp_session::datatypes::{DeliverSm, SubmitSm};
use smpp_session::session::{
    BindParameters, KeepAliveConfig, MessageHandler, ProcessResult, Session, SessionConfig,
    SessionState,
};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Submit short messages to an SMSC
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the system id
    #[argh(option)]
    system_id: Option<String>,

    /// the password
    #[argh(option)]
    password: Option<String>,

    /// the hostname of IP address of the SMSC (default: localhost)
    #[argh(option)]
    host: Option<String>,

    /// the port to use when connecting to the SMSC (default: 2775)
    #[argh(option, short = 'p')]
    port: Option<u16>,

    /// the recipient telephone number
    #[argh(option, short = 't')]
    to: String,

    /// the telephone number that the message will be from
    #[argh(option, short = 'f')]
    from: String,

    /// the message to send
    #[argh(option, short = 'm')]
    message: String,

    /// how many copies to submit (default: 1)
    #[argh(option, short = 'n')]
    count: Option<u32>,

    /// request delivery receipts and wait this many seconds for them
    #[argh(option)]
    receipt_wait: Option<u64>,

    /// keep-alive interval in seconds (default: 30)
    #[argh(option)]
    keep_alive_interval: Option<u64>,
}

struct ReceiptPrinter;

impl MessageHandler for ReceiptPrinter {
    fn on_deliver_sm(&self, deliver: &DeliverSm) -> ProcessResult<()> {
        let text = String::from_utf8_lossy(&deliver.short_message);
        if deliver.is_delivery_receipt() {
            info!(from = %deliver.source, "delivery receipt: {text}");
        } else {
            info!(from = %deliver.source, "message: {text}");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let host = cli_args.host.unwrap_or_else(|| "localhost".to_owned());
    let port = cli_args.port.unwrap_or(2775);
    let keep_alive = KeepAliveConfig::new(Duration::from_secs(
        cli_args.keep_alive_interval.unwrap_or(30),
    ));
    let config = SessionConfig::default()
        .with_keep_alive(keep_alive)
        .with_state_listener(|new: SessionState, old: SessionState, session_id: &str| {
            info!(session_id, "{old} -> {new}");
        });

    let parameters = BindParameters::transceiver(
        cli_args.system_id.unwrap_or_default(),
        cli_args.password.unwrap_or_default(),
    );
    info!("Connecting to {host}:{port}");
    let (session, smsc) =
        Session::connect_and_bind((host.as_str(), port), parameters, config, Arc::new(ReceiptPrinter))
            .await?;
    info!("Bound to {smsc}");

    for n in 0..cli_args.count.unwrap_or(1) {
        let mut submit = SubmitSm::new(
            cli_args.from.as_str(),
            cli_args.to.as_str(),
            cli_args.message.clone().into_bytes(),
        );
        if cli_args.receipt_wait.is_some() {
            submit = submit.with_delivery_receipt();
        }
        match session.send(submit).await {
            Ok(response) => info!("message {n} accepted as {}", response.message_id),
            Err(err) => error!("message {n} failed: {err}"),
        }
    }

    if let Some(wait) = cli_args.receipt_wait {
        tokio::time::sleep(Duration::from_secs(wait)).await;
    }

    session.unbind_and_close().await?;
    Ok(())
}
