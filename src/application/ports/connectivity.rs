use tokio::sync::watch;

/// Push-style network reachability signal from the host.
///
/// `subscribe` hands out a receiver whose value flips as reachability
/// changes; a false-to-true transition is the cue to attempt a sync.
pub trait ConnectivityMonitor: Send + Sync {
    fn is_connected(&self) -> bool;
    fn subscribe(&self) -> watch::Receiver<bool>;
}
