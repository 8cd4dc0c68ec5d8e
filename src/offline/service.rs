use super::cache::{Request, Response};
use super::worker::{Network, OfflineError, OfflineWorker};
use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

/// A request and what came back for it.
#[derive(Debug)]
pub struct Fetched {
    pub request: Request,
    pub result: Result<Response, OfflineError>,
}

/// Runs an [`OfflineWorker`] on its own thread so network waits never stall
/// the frame loop.
pub struct OfflineService {
    requests: Sender<Request>,
    fetched: Receiver<Fetched>,
    pending: usize,
}

impl OfflineService {
    /// Installs and activates `worker` in the background, then serves
    /// requests through it. Without a worker, or when the install fails,
    /// requests go straight to the network.
    pub fn spawn(worker: Option<OfflineWorker>, network: Box<dyn Network + Send>) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let (fetched_tx, fetched_rx) = mpsc::channel();

        thread::spawn(move || serve(worker, network.as_ref(), request_rx, fetched_tx));

        Self {
            requests: request_tx,
            fetched: fetched_rx,
            pending: 0,
        }
    }

    pub fn request(&mut self, request: Request) {
        debug!("Queueing {} {}", request.method, request.url);
        match self.requests.send(request) {
            Ok(()) => self.pending += 1,
            Err(e) => warn!("Offline service stopped, dropping {}", e.0.url),
        }
    }

    /// Next finished request, if any. Never blocks.
    pub fn try_recv(&mut self) -> Option<Fetched> {
        match self.fetched.try_recv() {
            Ok(fetched) => {
                self.pending = self.pending.saturating_sub(1);
                Some(fetched)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = 0;
                None
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending == 0
    }
}

fn serve(
    mut worker: Option<OfflineWorker>,
    network: &dyn Network,
    requests: Receiver<Request>,
    fetched: Sender<Fetched>,
) {
    if let Some(w) = worker.as_mut() {
        match w.install(network) {
            Ok(_) => {
                let purged = w.activate();
                info!(
                    "Offline cache {} active, purged {} stale caches",
                    w.version(),
                    purged.len()
                );
                debug!("Caches: {:?}", w.storage().names());
            }
            Err(e) => {
                warn!("Offline cache {} not installed: {}", w.version(), e);
                worker = None;
            }
        }
    }

    for request in requests {
        let result = match worker.as_mut() {
            Some(w) => w.fetch(network, &request),
            None => network.fetch(&request),
        };
        if fetched.send(Fetched { request, result }).is_err() {
            break;
        }
    }
    debug!("Offline service exiting");
}
