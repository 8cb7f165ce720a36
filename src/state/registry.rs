//! Client registry: the set of sessions that completed nickname negotiation.
//!
//! The join-ordered list and the nickname index live behind a single
//! `parking_lot::Mutex` and are always mutated together, so a nickname is in
//! the index exactly when its session is in the list. The lock is never held
//! across an `.await` or while writing to a client; broadcast works from a
//! [`ClientRegistry::snapshot`].

use super::session::Session;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    /// Sessions in registration order.
    sessions: Vec<Arc<Session>>,
    /// Case-sensitive nickname index.
    by_nick: HashMap<String, Arc<Session>>,
}

/// Shared nickname → session mapping.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    inner: Mutex<Inner>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `session.nick()` for `session`.
    ///
    /// Check and insert happen under one lock acquisition; when the name is
    /// taken nothing is modified and `false` is returned.
    pub fn try_register(&self, session: Arc<Session>) -> bool {
        let mut inner = self.inner.lock();
        if inner.by_nick.contains_key(session.nick()) {
            return false;
        }
        inner
            .by_nick
            .insert(session.nick().to_string(), Arc::clone(&session));
        inner.sessions.push(session);
        true
    }

    /// Remove `session` from both structures.
    ///
    /// Returns `true` only for the call that actually removed it.
    pub fn unregister(&self, session: &Session) -> bool {
        let mut inner = self.inner.lock();
        let Some(pos) = inner.sessions.iter().position(|s| s.id() == session.id()) else {
            return false;
        };
        let removed = inner.sessions.remove(pos);
        if inner
            .by_nick
            .get(removed.nick())
            .is_some_and(|owner| owner.id() == removed.id())
        {
            inner.by_nick.remove(removed.nick());
        }
        true
    }

    /// The session currently bound to `nick`.
    pub fn lookup(&self, nick: &str) -> Option<Arc<Session>> {
        self.inner.lock().by_nick.get(nick).cloned()
    }

    /// Point-in-time copy of all sessions in registration order.
    pub fn snapshot(&self) -> Vec<Arc<Session>> {
        self.inner.lock().sessions.clone()
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::session;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn register_then_lookup() {
        let registry = ClientRegistry::new();
        let (alice, _rx) = session(1, "alice", 4);

        assert!(registry.try_register(Arc::clone(&alice)));
        let found = registry.lookup("alice").unwrap();
        assert_eq!(found.id(), alice.id());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_is_rejected_without_mutation() {
        let registry = ClientRegistry::new();
        let (first, _rx1) = session(1, "X", 4);
        let (second, _rx2) = session(2, "X", 4);

        assert!(registry.try_register(Arc::clone(&first)));
        assert!(!registry.try_register(Arc::clone(&second)));

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id(), first.id());
        assert_eq!(registry.lookup("X").unwrap().id(), first.id());
    }

    #[test]
    fn nicknames_are_case_sensitive() {
        let registry = ClientRegistry::new();
        let (lower, _rx1) = session(1, "olena", 4);
        let (upper, _rx2) = session(2, "Olena", 4);

        assert!(registry.try_register(lower));
        assert!(registry.try_register(upper));
        assert!(registry.lookup("OLENA").is_none());
    }

    #[test]
    fn unregister_removes_from_both_structures() {
        let registry = ClientRegistry::new();
        let (alice, _rx1) = session(1, "alice", 4);
        let (bob, _rx2) = session(2, "bob", 4);
        registry.try_register(Arc::clone(&alice));
        registry.try_register(Arc::clone(&bob));

        assert!(registry.unregister(&alice));
        assert!(registry.lookup("alice").is_none());
        assert!(registry.snapshot().iter().all(|s| s.id() != alice.id()));
        assert_eq!(registry.lookup("bob").unwrap().id(), bob.id());
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = ClientRegistry::new();
        let (alice, _rx) = session(1, "alice", 4);
        registry.try_register(Arc::clone(&alice));

        assert!(registry.unregister(&alice));
        assert!(!registry.unregister(&alice));
        assert!(registry.is_empty());
    }

    #[test]
    fn unregistering_a_rejected_session_keeps_the_owner() {
        let registry = ClientRegistry::new();
        let (owner, _rx1) = session(1, "X", 4);
        let (loser, _rx2) = session(2, "X", 4);
        registry.try_register(Arc::clone(&owner));
        registry.try_register(Arc::clone(&loser));

        assert!(!registry.unregister(&loser));
        assert_eq!(registry.lookup("X").unwrap().id(), owner.id());
    }

    #[test]
    fn snapshot_keeps_registration_order_and_is_detached() {
        let registry = ClientRegistry::new();
        let names = ["c", "a", "b"];
        let mut keep = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let (s, rx) = session(i as u64 + 1, name, 4);
            registry.try_register(s);
            keep.push(rx);
        }

        let snapshot = registry.snapshot();
        let (late, _rx) = session(9, "late", 4);
        registry.try_register(late);

        let order: Vec<&str> = snapshot.iter().map(|s| s.nick()).collect();
        assert_eq!(order, names);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn concurrent_claims_for_one_name_have_one_winner() {
        const CONTENDERS: usize = 16;

        for _ in 0..50 {
            let registry = Arc::new(ClientRegistry::new());
            let barrier = Arc::new(Barrier::new(CONTENDERS));

            let handles: Vec<_> = (0..CONTENDERS)
                .map(|i| {
                    let registry = Arc::clone(&registry);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        let (s, rx) = session(i as u64 + 1, "X", 1);
                        barrier.wait();
                        let won = registry.try_register(s);
                        (won, rx)
                    })
                })
                .collect();

            let winners = handles
                .into_iter()
                .map(|h| h.join().unwrap().0)
                .filter(|won| *won)
                .count();

            assert_eq!(winners, 1);
            assert_eq!(registry.len(), 1);
        }
    }
}
