use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use super::Store;
use crate::models::Snapshot;

/// Handle to the one `Store` of the process.
///
/// Writers are serialized by the mutex. After each `mutate` the new snapshot
/// is published on a watch channel so subscribers can re-render.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<Store>>,
    updates: Arc<watch::Sender<Snapshot>>,
}

impl SharedStore {
    pub fn new(store: Store) -> Self {
        let (tx, _rx) = watch::channel(store.snapshot());
        Self {
            inner: Arc::new(Mutex::new(store)),
            updates: Arc::new(tx),
        }
    }

    pub async fn read<T>(&self, f: impl FnOnce(&Store) -> T) -> T {
        let store = self.inner.lock().await;
        f(&store)
    }

    pub async fn mutate<T>(&self, f: impl FnOnce(&mut Store) -> T) -> T {
        let mut store = self.inner.lock().await;
        let out = f(&mut store);
        self.updates.send_replace(store.snapshot());
        out
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.read(Store::snapshot).await
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }
}
