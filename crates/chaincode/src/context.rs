use serde::Serialize;
use serde::de::DeserializeOwned;

use pharmanet_auth::{ClientIdentity, Organisation, authorize};
use pharmanet_core::{ChaincodeStub, DomainResult, Entity};

/// Everything a chaincode function sees of its transaction.
pub struct TxContext<'a> {
    pub stub: &'a mut dyn ChaincodeStub,
    pub client: &'a ClientIdentity,
}

impl<'a> TxContext<'a> {
    pub fn new(stub: &'a mut dyn ChaincodeStub, client: &'a ClientIdentity) -> Self {
        Self { stub, client }
    }

    pub(crate) fn require(&self, operation: &str, allowed: &[Organisation]) -> DomainResult<Organisation> {
        Ok(authorize(self.client, operation, allowed)?)
    }

    pub(crate) fn read<T: DeserializeOwned>(&mut self, key: &str) -> DomainResult<Option<T>> {
        match self.stub.get_state(key)? {
            Some(bytes) if !bytes.is_empty() => Ok(Some(serde_json::from_slice(&bytes)?)),
            _ => Ok(None),
        }
    }

    pub(crate) fn write<E: Entity + Serialize>(&mut self, entity: &E) -> DomainResult<()> {
        let bytes = serde_json::to_vec(entity)?;
        self.stub.put_state(entity.key(), bytes)
    }

    /// Decode every committed record under a partial composite key.
    pub(crate) fn search<T: DeserializeOwned>(&mut self, object_type: &str, attributes: &[&str]) -> DomainResult<Vec<T>> {
        self.stub
            .get_state_by_partial_composite_key(object_type, attributes)?
            .into_iter()
            .filter(|kv| !kv.value.is_empty())
            .map(|kv| Ok(serde_json::from_slice(&kv.value)?))
            .collect()
    }

    pub(crate) fn emit<T: Serialize>(&mut self, name: &str, payload: &T) -> DomainResult<()> {
        let bytes = serde_json::to_vec(payload)?;
        self.stub.set_event(name, bytes)
    }
}
