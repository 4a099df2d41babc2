//! Transaction pipeline and client gateway.
//!
//! ```text
//! submit
//!   ↓
//! 1. Simulate: run the contract function against committed state
//!    (reads recorded with versions, writes buffered)
//!   ↓
//! 2. Commit: validate the read set (MVCC) and apply the write set atomically
//!   ↓
//! 3. Publish the transaction's chaincode event, if any
//! ```
//!
//! `evaluate` stops after step 1 and discards the simulation. A failure at any
//! step leaves the world state untouched; a publish failure happens after the
//! commit and is reported to the caller (at-least-once delivery).
//!
//! Events are published after the world-state lock is released, so concurrent
//! commits may reach subscribers out of order. Each event carries the block
//! number of its commit.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use pharmanet_auth::{ClientIdentity, Organisation};
use pharmanet_chaincode::{ContractName, TxContext, invoke};
use pharmanet_core::DomainError;
use pharmanet_events::{ChaincodeEvent, EventBus};

use crate::simulation::{Simulation, TransactionSimulator};
use crate::wallet::{FileSystemWallet, WalletError};
use crate::world_state::{CommitReceipt, WorldState, WorldStateError};

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The wallet has no identity for the organisation's admin.
    #[error("identity {label} not found in the {org} wallet")]
    IdentityNotFound { org: Organisation, label: String },

    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// The chaincode rejected the transaction during simulation.
    #[error("{0}")]
    Chaincode(#[from] DomainError),

    /// The transaction was simulated but failed validation at commit.
    #[error("transaction invalidated at commit: {0}")]
    Rejected(WorldStateError),

    #[error("world state error: {0}")]
    WorldState(WorldStateError),

    /// Publication failed after a successful commit.
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl From<WorldStateError> for GatewayError {
    fn from(value: WorldStateError) -> Self {
        match value {
            WorldStateError::MvccConflict { .. } | WorldStateError::PhantomConflict(_) => GatewayError::Rejected(value),
            WorldStateError::Unavailable(_) => GatewayError::WorldState(value),
        }
    }
}

/// A channel with one chaincode deployed on it.
#[derive(Debug)]
pub struct Network<W, B> {
    channel: String,
    chaincode: String,
    world: W,
    bus: B,
}

impl<W, B> Network<W, B> {
    pub fn new(channel: impl Into<String>, chaincode: impl Into<String>, world: W, bus: B) -> Self {
        Self {
            channel: channel.into(),
            chaincode: chaincode.into(),
            world,
            bus,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn chaincode(&self) -> &str {
        &self.chaincode
    }

    pub fn world(&self) -> &W {
        &self.world
    }
}

impl<W, B> Network<W, B>
where
    W: WorldState,
    B: EventBus<ChaincodeEvent>,
{
    /// Run a contract function against committed state without committing.
    pub fn simulate(
        &self,
        client: &ClientIdentity,
        contract: ContractName,
        function: &str,
        args: &[String],
    ) -> Result<(Vec<u8>, Simulation), GatewayError> {
        let mut simulator = TransactionSimulator::new(&self.world);
        let tx_id = pharmanet_core::ChaincodeStub::tx_id(&simulator);

        let result = invoke(&mut TxContext::new(&mut simulator, client), contract, function, args);
        match result {
            Ok(payload) => {
                tracing::debug!(%tx_id, %contract, function, "simulation succeeded");
                Ok((payload, simulator.finish()))
            }
            Err(err) => {
                tracing::warn!(%tx_id, %contract, function, msp = client.msp_id(), error = %err, "transaction rejected by chaincode");
                Err(GatewayError::Chaincode(err))
            }
        }
    }

    /// Validate and apply a simulation, then publish its event.
    pub fn commit(&self, simulation: Simulation) -> Result<CommitReceipt, GatewayError> {
        let Simulation { transaction, event } = simulation;
        let tx_id = transaction.tx_id;

        let receipt = self.world.commit(transaction).map_err(|err| {
            tracing::warn!(%tx_id, error = %err, "transaction invalidated at commit");
            GatewayError::from(err)
        })?;

        if let Some(event) = event {
            let message = ChaincodeEvent::new(
                tx_id,
                receipt.block_number,
                self.chaincode.clone(),
                event.name,
                Utc::now(),
                event.payload,
            );
            let delivered = self
                .bus
                .publish(message)
                .map_err(|e| GatewayError::Publish(e.to_string()))?;
            tracing::debug!(%tx_id, block = receipt.block_number, delivered, "chaincode event published");
        }

        Ok(receipt)
    }

    pub fn submit(
        &self,
        client: &ClientIdentity,
        contract: ContractName,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, GatewayError> {
        let (payload, simulation) = self.simulate(client, contract, function, args)?;
        let receipt = self.commit(simulation)?;

        tracing::info!(
            tx_id = %receipt.tx_id,
            block = receipt.block_number,
            keys = receipt.keys_written,
            channel = %self.channel,
            function,
            "transaction committed"
        );
        Ok(payload)
    }

    pub fn evaluate(
        &self,
        client: &ClientIdentity,
        contract: ContractName,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, GatewayError> {
        self.simulate(client, contract, function, args).map(|(payload, _)| payload)
    }
}

/// A connection to the network as one organisation's admin.
///
/// Dropping the gateway disconnects it.
#[derive(Debug)]
pub struct Gateway<W, B> {
    network: Arc<Network<W, B>>,
    org: Organisation,
    client: ClientIdentity,
}

impl<W, B> Gateway<W, B> {
    /// Connect with the `<ORG>_ADMIN` identity from `wallet`.
    pub fn connect(network: Arc<Network<W, B>>, wallet: &FileSystemWallet, org: Organisation) -> Result<Self, GatewayError> {
        let label = org.admin_label();
        let identity = wallet
            .get(org, &label)?
            .ok_or_else(|| GatewayError::IdentityNotFound { org, label: label.clone() })?;

        tracing::debug!(org = %org, channel = network.channel(), "connected to gateway");
        Ok(Self {
            client: ClientIdentity::from_x509(&label, &identity),
            network,
            org,
        })
    }

    pub fn organisation(&self) -> Organisation {
        self.org
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.client
    }

    /// The organisation's contract (consumers use the manufacturer's).
    pub fn contract(&self) -> Contract<'_, W, B> {
        Contract {
            gateway: self,
            name: ContractName::for_organisation(self.org),
        }
    }
}

/// Handle on one contract of the chaincode.
pub struct Contract<'g, W, B> {
    gateway: &'g Gateway<W, B>,
    name: ContractName,
}

impl<W, B> Contract<'_, W, B>
where
    W: WorldState,
    B: EventBus<ChaincodeEvent>,
{
    pub fn name(&self) -> ContractName {
        self.name
    }

    pub fn submit_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.gateway.network.submit(&self.gateway.client, self.name, function, &args)
    }

    pub fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.gateway.network.evaluate(&self.gateway.client, self.name, function, &args)
    }
}
