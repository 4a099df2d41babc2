//! In-memory event bus for the in-process network.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, Subscription};

#[derive(Debug, thiserror::Error)]
pub enum InMemoryBusError {
    #[error("event bus subscriber list is poisoned")]
    Poisoned,
}

/// Fan-out over std channels, one sender per subscription.
///
/// A subscription whose receiver was dropped is removed the next time a
/// message is published.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<usize, Self::Error> {
        let mut subscribers = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        let live_before = subscribers.len();
        subscribers.retain(|sender| sender.send(message.clone()).is_ok());

        let delivered = subscribers.len();
        if delivered < live_before {
            tracing::debug!(closed = live_before - delivered, delivered, "closed event subscriptions removed");
        }
        Ok(delivered)
    }

    fn subscribe(&self) -> Subscription<M> {
        let (sender, receiver) = mpsc::channel();
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(sender),
            // The receiver then reports `Disconnected` straight away.
            Err(_) => tracing::warn!("event bus poisoned, subscription will not receive events"),
        }
        Subscription::new(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscription_receives_each_event() {
        let bus = InMemoryEventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        assert_eq!(bus.publish("createPO_Event".to_string()).unwrap(), 2);

        assert_eq!(first.try_recv().unwrap(), "createPO_Event");
        assert_eq!(second.try_recv().unwrap(), "createPO_Event");
    }

    #[test]
    fn closed_subscriptions_stop_counting() {
        let bus = InMemoryEventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        assert_eq!(bus.publish(1u32).unwrap(), 1);
        assert_eq!(bus.publish(2u32).unwrap(), 1);
        assert_eq!(kept.try_recv().unwrap(), 1);
    }

    #[test]
    fn publishing_without_subscribers_delivers_nothing() {
        let bus: InMemoryEventBus<u32> = InMemoryEventBus::new();
        assert_eq!(bus.publish(7).unwrap(), 0);
    }

    #[test]
    fn poisoned_bus_reports_an_error() {
        let bus = std::sync::Arc::new(InMemoryEventBus::<u32>::new());
        let poisoner = bus.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.subscribers.lock().unwrap();
            panic!("poison the subscriber list");
        })
        .join();

        let err = bus.publish(1).unwrap_err();
        assert_eq!(err.to_string(), "event bus subscriber list is poisoned");
        let subscription: Subscription<u32> = bus.subscribe();
        assert!(subscription.recv().is_err());
    }
}
