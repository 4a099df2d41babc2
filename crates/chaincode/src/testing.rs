//! Minimal ledger double for unit tests: buffered writes, commit on success.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use pharmanet_auth::{ClientIdentity, Organisation, X509Identity};
use pharmanet_core::{
    ChaincodeStub, DomainResult, KeyModification, KeyValue, TxId, create_composite_key,
};

use crate::context::TxContext;

#[derive(Default)]
pub(crate) struct MockLedger {
    state: BTreeMap<String, Vec<u8>>,
    history: HashMap<String, Vec<KeyModification>>,
    events: Vec<(String, Vec<u8>)>,
}

struct MockStub<'a> {
    state: &'a BTreeMap<String, Vec<u8>>,
    history: &'a HashMap<String, Vec<KeyModification>>,
    tx_id: TxId,
    timestamp: DateTime<Utc>,
    writes: BTreeMap<String, Vec<u8>>,
    event: Option<(String, Vec<u8>)>,
}

impl ChaincodeStub for MockStub<'_> {
    fn tx_id(&self) -> TxId {
        self.tx_id
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn get_state(&mut self, key: &str) -> DomainResult<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> DomainResult<()> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[&str],
    ) -> DomainResult<Vec<KeyValue>> {
        let prefix = create_composite_key(object_type, attributes)?;
        Ok(self
            .state
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: v.clone(),
            })
            .collect())
    }

    fn get_history_for_key(&mut self, key: &str) -> DomainResult<Vec<KeyModification>> {
        Ok(self.history.get(key).cloned().unwrap_or_default())
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> DomainResult<()> {
        self.event = Some((name.to_string(), payload));
        Ok(())
    }
}

impl MockLedger {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Run `f` as a transaction submitted by `org`'s admin; commit only on success.
    pub(crate) fn submit<T>(
        &mut self,
        org: Organisation,
        f: impl FnOnce(&mut TxContext<'_>) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let client = ClientIdentity::from_x509(&org.admin_label(), &X509Identity::new(org.msp_id(), "cert", "key"));
        let (result, tx_id, timestamp, writes, event) = {
            let mut stub = MockStub {
                state: &self.state,
                history: &self.history,
                tx_id: TxId::new(),
                timestamp: Utc::now(),
                writes: BTreeMap::new(),
                event: None,
            };
            let result = f(&mut TxContext::new(&mut stub, &client));
            (result, stub.tx_id, stub.timestamp, stub.writes, stub.event)
        };

        let value = result?;
        for (key, bytes) in writes {
            self.history.entry(key.clone()).or_default().push(KeyModification {
                tx_id,
                timestamp,
                value: bytes.clone(),
            });
            self.state.insert(key, bytes);
        }
        if let Some(event) = event {
            self.events.push(event);
        }
        Ok(value)
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.state.get(key).map(|bytes| serde_json::from_slice(bytes).unwrap())
    }

    pub(crate) fn last_event(&self) -> Option<(&str, serde_json::Value)> {
        self.events
            .last()
            .map(|(name, payload)| (name.as_str(), serde_json::from_slice(payload).unwrap()))
    }

    /// Register one company per supply-chain role:
    /// `MAN001` manufacturer, `DIST001` distributor, `RET001` retailer, `TRA001` transporter.
    pub(crate) fn with_companies() -> Self {
        let mut ledger = Self::new();
        for (org, crn, name, role) in [
            (Organisation::Manufacturer, "MAN001", "Sun Pharma", "Manufacturer"),
            (Organisation::Distributor, "DIST001", "VG Pharma", "Distributor"),
            (Organisation::Retailer, "RET001", "Upgrad Chemists", "Retailer"),
            (Organisation::Transporter, "TRA001", "FedEx", "Transporter"),
        ] {
            ledger
                .submit(org, |ctx| crate::company::register_company(ctx, crn, name, "Chennai", role))
                .unwrap();
        }
        ledger
    }

    /// Manufacture `serials` of `drug` at `MAN001`.
    pub(crate) fn add_drugs(&mut self, drug: &str, serials: &[&str]) {
        for serial in serials {
            self.submit(Organisation::Manufacturer, |ctx| {
                crate::drug::add_drug(ctx, drug, serial, "2024-01-01", "2026-01-01", "MAN001")
            })
            .unwrap();
        }
    }
}
