use crate::application::ports::ConnectivityMonitor;
use tokio::sync::watch;

/// Watch-channel connectivity monitor. The host wires OS reachability
/// callbacks into `set_connected`; tests drive it directly.
pub struct WatchConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl WatchConnectivityMonitor {
    pub fn new(initially_connected: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_connected);
        Self { tx }
    }

    pub fn set_connected(&self, connected: bool) {
        // send_replace never fails; the sender keeps its own receiver alive.
        self.tx.send_replace(connected);
    }
}

impl ConnectivityMonitor for WatchConnectivityMonitor {
    fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
