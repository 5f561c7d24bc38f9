pub mod connectivity;
pub mod key_value_store;
pub mod sync_gateway;

pub use connectivity::ConnectivityMonitor;
pub use key_value_store::KeyValueStore;
pub use sync_gateway::{SyncGateway, SyncOutcome};
