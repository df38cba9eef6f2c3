// File: crates/chart-store/src/store.rs
// Summary: Dual-mode annotation store: local blob while anonymous, remote per-user store once
//          authenticated, with an in-memory mirror that is always authoritative for the session.
// Notes:
// - Remote requests are fire-and-forget tasks on the supplied tokio runtime. Their results come
//   back over a channel and are folded into the mirror by `sync` (non-blocking) or `flush`.
// - Remote failures are logged and dropped; the optimistic mirror is never rolled back.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use chart_core::{Annotations, Drawing, DrawingId, Scope};

use crate::api::{DrawingsApi, NewDrawing};
use crate::kv::{KeyValue, STORAGE_KEY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreMode {
    Anonymous,
    Authenticated,
}

/// Outcome of one remote request. Every spawned request sends exactly one, even if it panics.
#[derive(Debug)]
enum RemoteEvent {
    Loaded { scope: Scope, drawings: Vec<Drawing> },
    Created { local_id: DrawingId, drawing: Drawing },
    CreateFailed { local_id: DrawingId },
    Done,
}

struct Remote {
    api: Arc<dyn DrawingsApi>,
    runtime: Handle,
    tx: UnboundedSender<RemoteEvent>,
    rx: UnboundedReceiver<RemoteEvent>,
    in_flight: usize,
}

/// Sends one event when dropped: the set outcome, or `fallback` when the task panicked or was
/// dropped before finishing.
struct Reply {
    tx: UnboundedSender<RemoteEvent>,
    event: Option<RemoteEvent>,
    fallback: Option<RemoteEvent>,
}

impl Reply {
    fn new(tx: UnboundedSender<RemoteEvent>, fallback: RemoteEvent) -> Self {
        Self { tx, event: None, fallback: Some(fallback) }
    }

    fn set(&mut self, event: RemoteEvent) {
        self.event = Some(event);
    }
}

impl Drop for Reply {
    fn drop(&mut self) {
        if let Some(event) = self.event.take().or_else(|| self.fallback.take()) {
            let _ = self.tx.send(event);
        }
    }
}

impl Remote {
    fn new(api: Arc<dyn DrawingsApi>, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self { api, runtime, tx, rx, in_flight: 0 }
    }

    fn spawn_list(&mut self, scope: Scope) {
        let api = self.api.clone();
        let mut reply = Reply::new(self.tx.clone(), RemoteEvent::Done);
        self.in_flight += 1;
        self.runtime.spawn(async move {
            match api.list(&scope).await {
                Ok(drawings) => {
                    info!(%scope, count = drawings.len(), "remote drawings loaded");
                    reply.set(RemoteEvent::Loaded { scope, drawings });
                }
                Err(e) => warn!(%scope, error = %e, "remote drawings load failed"),
            }
        });
    }

    fn spawn_create(&mut self, local_id: DrawingId, body: NewDrawing) {
        let api = self.api.clone();
        let mut reply = Reply::new(self.tx.clone(), RemoteEvent::CreateFailed { local_id: local_id.clone() });
        self.in_flight += 1;
        self.runtime.spawn(async move {
            match api.create(&body).await {
                Ok(drawing) => reply.set(RemoteEvent::Created { local_id, drawing }),
                Err(e) => warn!(id = %local_id, error = %e, "remote drawing create failed"),
            }
        });
    }

    fn spawn_delete(&mut self, id: DrawingId) {
        let api = self.api.clone();
        let reply = Reply::new(self.tx.clone(), RemoteEvent::Done);
        self.in_flight += 1;
        self.runtime.spawn(async move {
            let _reply = reply;
            if let Err(e) = api.delete(&id).await {
                warn!(%id, error = %e, "remote drawing delete failed");
            }
        });
    }
}

/// Drawings for every scope, in insertion order.
pub struct AnnotationStore<K: KeyValue> {
    mirror: Vec<Drawing>,
    kv: K,
    remote: Option<Remote>,
    /// Scopes whose remote load has been issued since authentication.
    fetched: HashSet<Scope>,
    /// Ids removed this session; remote loads never bring them back.
    removed: HashSet<DrawingId>,
    /// Local ids whose create request has not completed yet.
    creating: HashSet<DrawingId>,
}

impl<K: KeyValue> AnnotationStore<K> {
    /// Open an anonymous store, restoring the local blob. An unreadable blob starts empty.
    pub fn open(kv: K) -> Self {
        let mirror = read_blob(&kv);
        debug!(count = mirror.len(), "annotation store opened");
        Self {
            mirror,
            kv,
            remote: None,
            fetched: HashSet::new(),
            removed: HashSet::new(),
            creating: HashSet::new(),
        }
    }

    pub fn mode(&self) -> StoreMode {
        if self.remote.is_some() { StoreMode::Authenticated } else { StoreMode::Anonymous }
    }

    pub fn is_authenticated(&self) -> bool { self.remote.is_some() }

    /// Every drawing in the mirror, all scopes.
    pub fn all(&self) -> &[Drawing] { &self.mirror }

    pub fn kv(&self) -> &K { &self.kv }

    /// Remote requests whose outcome has not been applied yet.
    pub fn pending_requests(&self) -> usize {
        self.remote.as_ref().map_or(0, |r| r.in_flight)
    }

    /// Switch to authenticated mode. Drawings already in the mirror stay put; scopes are
    /// fetched from `api` on their next `load`.
    pub fn authenticate(&mut self, api: Arc<dyn DrawingsApi>, runtime: Handle) {
        if self.remote.is_some() {
            return;
        }
        self.remote = Some(Remote::new(api, runtime));
        self.fetched.clear();
        info!(resident = self.mirror.len(), "annotation store authenticated");
    }

    /// Back to anonymous mode: the mirror is restored from the local blob, minus anything
    /// removed while signed in, and in-flight results are discarded.
    pub fn sign_out(&mut self) {
        if self.remote.take().is_none() {
            return;
        }
        self.fetched.clear();
        self.creating.clear();
        let blob = read_blob(&self.kv);
        let stored = blob.len();
        self.mirror = blob.into_iter().filter(|d| !self.removed.contains(&d.id)).collect();
        if self.mirror.len() != stored {
            self.persist();
        }
        info!(restored = self.mirror.len(), "annotation store signed out");
    }

    /// Fetch `scope` from the remote store once per authentication. No-op while anonymous.
    pub fn load(&mut self, scope: &Scope) {
        let Some(remote) = self.remote.as_mut() else { return };
        if !self.fetched.insert(scope.clone()) {
            return;
        }
        remote.spawn_list(scope.clone());
    }

    pub fn add(&mut self, drawing: Drawing) {
        debug!(id = %drawing.id, scope = %drawing.scope, tool = %drawing.tool_type(), "drawing added");
        if let Some(remote) = self.remote.as_mut() {
            self.creating.insert(drawing.id.clone());
            remote.spawn_create(drawing.id.clone(), NewDrawing::from(&drawing));
        }
        self.mirror.push(drawing);
        self.persist();
    }

    /// Remove by id; an absent id is a no-op.
    pub fn remove(&mut self, id: &DrawingId) {
        let Some(pos) = self.mirror.iter().position(|d| &d.id == id) else { return };
        self.mirror.remove(pos);
        self.forget(id.clone());
        debug!(%id, "drawing removed");
        self.persist();
    }

    /// Remove every drawing of `scope`.
    pub fn clear(&mut self, scope: &Scope) {
        let (gone, kept): (Vec<Drawing>, Vec<Drawing>) =
            std::mem::take(&mut self.mirror).into_iter().partition(|d| d.in_scope(scope));
        self.mirror = kept;
        if gone.is_empty() {
            return;
        }
        debug!(%scope, count = gone.len(), "scope cleared");
        for d in gone {
            self.forget(d.id);
        }
        self.persist();
    }

    pub fn list_for(&self, scope: &Scope) -> Vec<&Drawing> {
        self.mirror.iter().filter(|d| d.in_scope(scope)).collect()
    }

    /// Apply completed remote results without waiting. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(remote) = self.remote.as_mut() else { break };
            let Ok(event) = remote.rx.try_recv() else { break };
            remote.in_flight = remote.in_flight.saturating_sub(1);
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for every in-flight remote request, including follow-ups, and apply the results.
    pub async fn flush(&mut self) {
        loop {
            let Some(remote) = self.remote.as_mut() else { return };
            if remote.in_flight == 0 {
                return;
            }
            let Some(event) = remote.rx.recv().await else { return };
            remote.in_flight -= 1;
            self.apply(event);
        }
    }

    fn apply(&mut self, event: RemoteEvent) {
        match event {
            RemoteEvent::Loaded { scope, drawings } => self.merge(&scope, drawings),
            RemoteEvent::Created { local_id, drawing } => self.adopt(local_id, drawing),
            RemoteEvent::CreateFailed { local_id } => {
                self.creating.remove(&local_id);
            }
            RemoteEvent::Done => {}
        }
    }

    /// Union by id: resident entries keep their place, unseen remote ones are appended.
    fn merge(&mut self, scope: &Scope, drawings: Vec<Drawing>) {
        let mut known: HashSet<DrawingId> = self.mirror.iter().map(|d| d.id.clone()).collect();
        let before = self.mirror.len();
        for d in drawings {
            if !d.in_scope(scope) || self.removed.contains(&d.id) || !known.insert(d.id.clone()) {
                continue;
            }
            self.mirror.push(d);
        }
        debug!(%scope, merged = self.mirror.len() - before, "remote drawings merged");
    }

    /// Re-key an optimistic entry to its server record.
    fn adopt(&mut self, local_id: DrawingId, stored: Drawing) {
        self.creating.remove(&local_id);
        let server_id = stored.id.clone();
        let Some(pos) = self.mirror.iter().position(|d| d.id == local_id) else {
            // Removed while the create was in flight.
            if self.removed.contains(&local_id) {
                self.removed.insert(server_id.clone());
                if let Some(remote) = self.remote.as_mut() {
                    remote.spawn_delete(server_id);
                }
            }
            return;
        };
        if self.mirror.iter().any(|d| d.id == server_id) {
            // A load already brought the server copy in.
            self.mirror.remove(pos);
        } else {
            let entry = &mut self.mirror[pos];
            entry.id = server_id.clone();
            entry.created_at = stored.created_at;
        }
        debug!(%local_id, %server_id, "server id adopted");
    }

    fn forget(&mut self, id: DrawingId) {
        if let Some(remote) = self.remote.as_mut() {
            // A pending create is deleted once its server id is known.
            if !self.creating.contains(&id) {
                remote.spawn_delete(id.clone());
            }
        }
        self.removed.insert(id);
    }

    /// Mirror to the local blob; anonymous mode only.
    fn persist(&mut self) {
        if self.remote.is_some() {
            return;
        }
        let json = match serde_json::to_string(&self.mirror) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "drawings blob encode failed");
                return;
            }
        };
        if let Err(e) = self.kv.set(STORAGE_KEY, &json) {
            warn!(error = %e, "drawings blob write failed");
        }
    }
}

fn read_blob<K: KeyValue>(kv: &K) -> Vec<Drawing> {
    let raw = match kv.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "drawings blob read failed");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(drawings) => drawings,
        Err(e) => {
            warn!(error = %e, "drawings blob unreadable, starting empty");
            Vec::new()
        }
    }
}

impl<K: KeyValue> Annotations for AnnotationStore<K> {
    fn list_for(&self, scope: &Scope) -> Vec<&Drawing> {
        AnnotationStore::list_for(self, scope)
    }

    fn add(&mut self, drawing: Drawing) {
        AnnotationStore::add(self, drawing);
    }

    fn remove(&mut self, id: &DrawingId) {
        AnnotationStore::remove(self, id);
    }
}
