//! Service wiring: in-process network, wallet and the realtime event channel.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use pharmanet_auth::Organisation;
use pharmanet_chaincode::Function;
use pharmanet_events::{ChaincodeEvent, EventBus, InMemoryEventBus};
use pharmanet_infra::{CryptoMaterial, FileSystemWallet, Gateway, GatewayError, InMemoryWorldState, Network};

use crate::config::AppConfig;

pub type PharmaNetwork = Network<Arc<InMemoryWorldState>, Arc<InMemoryEventBus<ChaincodeEvent>>>;

/// Committed chaincode event, as broadcast to SSE clients.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeMessage {
    pub event_name: String,
    pub tx_id: String,
    pub block_number: u64,
    pub committed_at: String,
    pub payload: serde_json::Value,
}

impl From<&ChaincodeEvent> for RealtimeMessage {
    fn from(event: &ChaincodeEvent) -> Self {
        Self {
            event_name: event.event_name().to_string(),
            tx_id: event.tx_id().to_string(),
            block_number: event.block_number(),
            committed_at: event.committed_at().to_rfc3339(),
            payload: event.payload_json(),
        }
    }
}

pub struct AppServices {
    network: Arc<PharmaNetwork>,
    wallet: FileSystemWallet,
    crypto: CryptoMaterial,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

/// Build services for `config`. Must run inside a tokio runtime.
pub fn build_services(config: &AppConfig) -> AppServices {
    let world = Arc::new(InMemoryWorldState::new());
    let bus: Arc<InMemoryEventBus<ChaincodeEvent>> = Arc::new(InMemoryEventBus::new());
    let network = Arc::new(Network::new(
        config.channel.clone(),
        config.chaincode.clone(),
        world,
        bus.clone(),
    ));

    // Realtime channel (SSE): lossy broadcast.
    let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);

    // Background subscriber: bus -> realtime channel. Ends once the bus is dropped.
    {
        let sub = bus.subscribe();
        let realtime_tx = realtime_tx.clone();
        tokio::task::spawn_blocking(move || {
            loop {
                match sub.recv_timeout(Duration::from_secs(1)) {
                    Ok(event) => {
                        tracing::debug!(event = event.event_name(), tx_id = %event.tx_id(), "forwarding chaincode event");
                        let _ = realtime_tx.send(RealtimeMessage::from(&event));
                    }
                    Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
                    Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
        });
    }

    AppServices {
        network,
        wallet: FileSystemWallet::new(&config.wallet_dir),
        crypto: CryptoMaterial::new(&config.crypto_config),
        realtime_tx,
    }
}

impl AppServices {
    pub fn wallet(&self) -> &FileSystemWallet {
        &self.wallet
    }

    pub fn crypto(&self) -> &CryptoMaterial {
        &self.crypto
    }

    pub fn realtime_tx(&self) -> &broadcast::Sender<RealtimeMessage> {
        &self.realtime_tx
    }

    /// Connect as `org`'s admin, run `function` and decode its JSON result.
    ///
    /// Read-only functions are evaluated, everything else is submitted. The
    /// gateway is dropped (disconnected) before returning.
    pub fn transact(
        &self,
        org: Organisation,
        function: Function,
        args: &[&str],
    ) -> Result<serde_json::Value, GatewayError> {
        let gateway = Gateway::connect(self.network.clone(), &self.wallet, org)?;
        let contract = gateway.contract();

        let bytes = if function.is_read_only() {
            contract.evaluate_transaction(function.name(), args)?
        } else {
            contract.submit_transaction(function.name(), args)?
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::Chaincode(pharmanet_core::DomainError::ledger(format!("invalid response: {e}"))))
    }
}

pub fn event_sse_stream(services: Arc<AppServices>) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.realtime_tx().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(m) => {
            let data = serde_json::to_string(&m).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.event_name).data(data)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
