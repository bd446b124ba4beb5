use super::EntityId;
use uuid::Uuid;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A deterministic ID generator that produces a sequence of EntityIds
/// based on a seed namespace and a counter.
///
/// Used by document adapters that need reproducible handles (the in-memory
/// document hands these out for every entity it creates).
#[derive(Debug, Clone)]
pub struct IdGenerator {
    namespace: Uuid,
    counter: Arc<AtomicUsize>,
}

impl IdGenerator {
    /// Create a new generator from a string seed.
    pub fn new(seed: &str) -> Self {
        let namespace = Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes());
        Self {
            namespace,
            counter: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Generate the next deterministic ID in the sequence.
    pub fn next_id(&self) -> EntityId {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        let uuid = Uuid::new_v5(&self.namespace, &count.to_be_bytes());
        EntityId::from_uuid(uuid)
    }

    /// Number of IDs handed out so far.
    pub fn issued(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}
