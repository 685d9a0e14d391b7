//! # Per-topic subscriber set.
//!
//! An unordered collection of [`ClientRef`] handles guarded by its own lock.
//!
//! ## Rules
//! - The lock is held only to append, swap-remove, or copy the member list.
//! - Broadcasts iterate a [`snapshot`](SubscriberSet::snapshot), never the live list.
//! - Membership is by handle identity (`Arc::ptr_eq`); a client appears at most once.
//! - Order carries no meaning; removal swaps the last member into the freed slot.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clients::ClientRef;

/// Clients subscribed to one topic.
#[derive(Debug, Default)]
pub(crate) struct SubscriberSet {
    clients: Mutex<Vec<ClientRef>>,
}

impl SubscriberSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends `client`. Returns `false` if it was already a member.
    pub(crate) async fn append(&self, client: ClientRef) -> bool {
        let mut clients = self.clients.lock().await;
        if clients.iter().any(|c| Arc::ptr_eq(c, &client)) {
            return false;
        }
        clients.push(client);
        true
    }

    /// Copies the current member list.
    pub(crate) async fn snapshot(&self) -> Vec<ClientRef> {
        self.clients.lock().await.clone()
    }

    /// Swap-removes `client` and marks it failed.
    ///
    /// A client that is not a member is still marked failed.
    /// Returns `Some(errors)` if the client was removed by this call.
    pub(crate) async fn remove(&self, client: &ClientRef) -> Option<usize> {
        let removed = {
            let mut clients = self.clients.lock().await;
            match clients.iter().position(|c| Arc::ptr_eq(c, client)) {
                Some(idx) => {
                    clients.swap_remove(idx);
                    true
                }
                None => false,
            }
        };

        let errors = client.fail().await;
        removed.then_some(errors)
    }

    pub(crate) async fn contains(&self, client: &ClientRef) -> bool {
        self.clients
            .lock()
            .await
            .iter()
            .any(|c| Arc::ptr_eq(c, client))
    }

    pub(crate) async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{Client, ClientState};

    async fn active_client(id: &str) -> ClientRef {
        let c = Client::new(id).shared();
        c.activate().await.unwrap();
        c
    }

    #[tokio::test]
    async fn test_append_is_identity_deduped() {
        let set = SubscriberSet::new();
        let a = active_client("same").await;
        let b = active_client("same").await;

        assert!(set.append(Arc::clone(&a)).await);
        assert!(!set.append(Arc::clone(&a)).await);
        assert!(set.append(Arc::clone(&b)).await);
        assert_eq!(set.len().await, 2);
    }

    #[tokio::test]
    async fn test_remove_every_other_client() {
        let set = SubscriberSet::new();
        let count = 20;
        let mut to_remove = Vec::new();

        for i in 0..count {
            let c = active_client(&format!("c{i}")).await;
            set.append(Arc::clone(&c)).await;
            if i % 2 == 0 {
                to_remove.push(c);
            }
        }

        for c in &to_remove {
            assert!(set.remove(c).await.is_some());
            assert_eq!(c.state().await, ClientState::Failed);
        }
        assert_eq!(set.len().await, count - to_remove.len());
        for c in &to_remove {
            assert!(!set.contains(c).await);
        }
    }

    #[tokio::test]
    async fn test_swap_remove_moves_last_into_slot() {
        let set = SubscriberSet::new();
        let a = active_client("a").await;
        let b = active_client("b").await;
        let c = active_client("c").await;
        for x in [&a, &b, &c] {
            set.append(Arc::clone(x)).await;
        }

        set.remove(&a).await;
        let ids: Vec<String> = set
            .snapshot()
            .await
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_remove_missing_client_still_fails_it() {
        let set = SubscriberSet::new();
        let stranger = active_client("stranger").await;

        assert_eq!(set.remove(&stranger).await, None);
        assert_eq!(stranger.state().await, ClientState::Failed);
        assert_eq!(set.len().await, 0);
    }
}
