use crate::{BeaconReply, BeaconRequest};
use alloy_primitives::B256;
use ember_primitives::SealedBlock;
use ember_rpc_types::engine::ForkchoiceState;
use lru::LruCache;
use parking_lot::{Mutex as PlMutex, RwLock};
use std::{
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::{mpsc, watch, Mutex};

/// How many invalid headers the bad-header memory retains.
const BAD_HEADER_CAPACITY: usize = 1024;

/// The importer's position in the proof-of-stake transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosStatus {
    /// No PoS download is in progress.
    #[default]
    Idle,
    /// The importer is downloading or processing PoS headers.
    Syncing,
}

/// Creates the paired endpoints of the engine ⇄ importer protocol.
///
/// [`BeaconEngineHandle`] goes to the engine server, [`BeaconImportQueue`] to
/// the importer (or its stand-in). The request queue is unbounded; the reply
/// channel holds a single slot so a reply can only ever answer the request
/// whose caller is currently blocked on it.
pub fn engine_channel() -> (BeaconEngineHandle, BeaconImportQueue) {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (reply_tx, reply_rx) = mpsc::channel(1);
    let (waiting_tx, waiting_rx) = watch::channel(false);
    let shared = Arc::new(Shared {
        waiting: waiting_tx,
        pos_sync: AtomicBool::new(false),
        pos_status: RwLock::new(PosStatus::default()),
        bad_headers: PlMutex::new(LruCache::new(
            NonZeroUsize::new(BAD_HEADER_CAPACITY).expect("capacity is non-zero"),
        )),
    });
    let handle = BeaconEngineHandle {
        request_tx,
        reply_rx: Mutex::new(reply_rx),
        waiting_rx,
        shared: shared.clone(),
    };
    let queue = BeaconImportQueue { request_rx, reply_tx, shared };
    (handle, queue)
}

struct Shared {
    /// `true` while the importer is parked on the request queue.
    waiting: watch::Sender<bool>,
    /// Whether the importer has switched to post-merge operation.
    pos_sync: AtomicBool,
    /// What the PoS header downloader is currently doing.
    pos_status: RwLock<PosStatus>,
    /// Hashes of known-bad headers, mapped to the last valid ancestor hash.
    bad_headers: PlMutex<LruCache<B256, B256>>,
}

/// The engine server's endpoint: enqueue requests, collect the paired reply,
/// probe the stage loop, and consult the downloader-adjacent state.
pub struct BeaconEngineHandle {
    request_tx: mpsc::UnboundedSender<BeaconRequest>,
    reply_rx: Mutex<mpsc::Receiver<BeaconReply>>,
    waiting_rx: watch::Receiver<bool>,
    shared: Arc<Shared>,
}

impl BeaconEngineHandle {
    /// Enqueues a payload for import.
    pub fn add_payload_request(&self, block: SealedBlock) {
        let _ = self.request_tx.send(BeaconRequest::NewPayload(block));
    }

    /// Enqueues a forkchoice state for application.
    pub fn add_fork_choice_request(&self, state: ForkchoiceState) {
        let _ = self.request_tx.send(BeaconRequest::ForkChoice(state));
    }

    /// Waits for the paired reply of the most recently enqueued request.
    ///
    /// Callers must hold the server mutex from enqueue through this call so
    /// replies cannot be claimed out of order. `None` means the importer has
    /// shut down.
    pub async fn recv_reply(&self) -> Option<BeaconReply> {
        self.reply_rx.lock().await.recv().await
    }

    /// Waits up to `deadline` for the importer to park on the request queue.
    /// Returns `false` if it did not, i.e. the stage loop is busy.
    pub async fn wait_for_waiting(&self, deadline: Duration) -> bool {
        let mut waiting = self.waiting_rx.clone();
        if *waiting.borrow() {
            return true
        }
        tokio::time::timeout(deadline, async move {
            while waiting.changed().await.is_ok() {
                if *waiting.borrow() {
                    return true
                }
            }
            false
        })
        .await
        .unwrap_or(false)
    }

    /// Whether the importer has transitioned to post-merge operation.
    pub fn pos_sync(&self) -> bool {
        self.shared.pos_sync.load(Ordering::Relaxed)
    }

    /// The PoS header downloader's current activity.
    pub fn pos_status(&self) -> PosStatus {
        *self.shared.pos_status.read()
    }

    /// Looks the hash up in the bad-header memory, returning the remembered
    /// last valid ancestor hash if the header is known bad.
    pub fn is_bad_header(&self, hash: B256) -> Option<B256> {
        self.shared.bad_headers.lock().get(&hash).copied()
    }

    /// Records a bad header along with its last valid ancestor.
    pub fn report_bad_header(&self, hash: B256, last_valid_hash: B256) {
        tracing::debug!(target: "consensus::beacon", ?hash, ?last_valid_hash, "Remembering bad header");
        self.shared.bad_headers.lock().put(hash, last_valid_hash);
    }
}

/// The importer's endpoint: drain requests one at a time and answer each on
/// the reply slot.
pub struct BeaconImportQueue {
    request_rx: mpsc::UnboundedReceiver<BeaconRequest>,
    reply_tx: mpsc::Sender<BeaconReply>,
    shared: Arc<Shared>,
}

impl BeaconImportQueue {
    /// Blocks until the next request arrives. The waiting flag is raised for
    /// the duration of the wait; the engine's busy probe observes it.
    ///
    /// `None` means the engine server has shut down.
    pub async fn next_request(&mut self) -> Option<BeaconRequest> {
        self.shared.waiting.send_replace(true);
        let request = self.request_rx.recv().await;
        self.shared.waiting.send_replace(false);
        request
    }

    /// Delivers the reply for the request taken last. Blocks while the
    /// previous reply is still unconsumed.
    pub async fn send_reply(&self, reply: BeaconReply) {
        if self.reply_tx.send(reply).await.is_err() {
            tracing::debug!(target: "consensus::beacon", "Engine server gone, dropping reply");
        }
    }

    /// Marks the importer as having reached post-merge operation.
    pub fn set_pos_sync(&self, pos_sync: bool) {
        self.shared.pos_sync.store(pos_sync, Ordering::Relaxed);
    }

    /// Publishes the downloader's activity.
    pub fn set_pos_status(&self, status: PosStatus) {
        *self.shared.pos_status.write() = status;
    }

    /// Records a bad header discovered during import.
    pub fn report_bad_header(&self, hash: B256, last_valid_hash: B256) {
        self.shared.bad_headers.lock().put(hash, last_valid_hash);
    }
}
