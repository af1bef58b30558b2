// ABOUTME: Minimal SMSC that accepts binds and answers submit_sm with random message ids
// ABOUTME: Useful as a local peer for the esme_client demo and for manual protocol testing

//! # SMSC simulator
//!
//! ```bash
//! cargo run --example smsc_simulator -- --port 2775 --password secret
//! ```

use argh::FromArgs;
use smpp_session::datatypes::{CommandStatus, DataSm, DeliverSm, SubmitSm};
use smpp_session::ids::{IdGenerator, RandomIdGenerator};
use smpp_session::session::{MessageHandler, ProcessResult, Session, SessionConfig};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Accepts ESME binds and acknowledges every message
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debugging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the port to listen on (default: 2775)
    #[argh(option, short = 'p')]
    port: Option<u16>,

    /// the system id sent back in bind responses (default: smsc)
    #[argh(option)]
    system_id: Option<String>,

    /// password required from ESMEs; any password is accepted when absent
    #[argh(option)]
    password: Option<String>,

    /// number of callback workers per bound session (default: 3)
    #[argh(option)]
    workers: Option<usize>,
}

#[derive(Debug)]
struct Simulator {
    message_ids: RandomIdGenerator,
}

impl MessageHandler for Simulator {
    fn on_submit_sm(&self, submit: &SubmitSm) -> ProcessResult<String> {
        let message_id = self.message_ids.generate();
        info!(
            from = %submit.source,
            to = %submit.destination,
            length = submit.short_message.len(),
            %message_id,
            "submit_sm"
        );
        Ok(message_id)
    }

    fn on_data_sm(&self, data: &DataSm) -> ProcessResult<String> {
        let message_id = self.message_ids.generate();
        info!(from = %data.source, to = %data.destination, %message_id, "data_sm");
        Ok(message_id)
    }

    fn on_deliver_sm(&self, deliver: &DeliverSm) -> ProcessResult<()> {
        info!(from = %deliver.source, "deliver_sm from an ESME");
        Err(CommandStatus::InvalidCommandId.into())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = argh::from_env();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli_args.debugging { Level::DEBUG } else { Level::INFO })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let port = cli_args.port.unwrap_or(2775);
    let system_id = cli_args.system_id.unwrap_or_else(|| "smsc".to_owned());
    let config = SessionConfig::default().with_processor_degree(cli_args.workers.unwrap_or(3));
    let handler = Arc::new(Simulator {
        message_ids: RandomIdGenerator::new(),
    });

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("SMSC simulator listening on port {port}");

    loop {
        let (socket, peer) = listener.accept().await?;
        let session = Session::accept(socket, config.clone(), handler.clone());
        let system_id = system_id.clone();
        let password = cli_args.password.clone();

        tokio::spawn(async move {
            let request = match session.wait_for_bind(Duration::from_secs(30)).await {
                Ok(request) => request,
                Err(err) => {
                    warn!(%peer, %err, "no bind received");
                    session.close().await;
                    return;
                }
            };

            let allowed = password.as_deref().is_none_or(|p| p == request.password());
            let outcome = if allowed {
                request.accept(&system_id).await
            } else {
                request.reject(CommandStatus::InvalidPassword).await
            };
            if let Err(err) = outcome {
                warn!(%peer, %err, "bind response not sent");
            }
            if !allowed {
                session.close().await;
            }
        });
    }
}
