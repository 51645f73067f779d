//! Delivery of finished export documents.

pub mod kamaitachi;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use kamaitachi::{HttpImportApi, ImportApi, ImportOutcome, KamaitachiSink};
pub use local::LocalStorage;

/// Receives the serialized export once a run succeeds.
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Deliver `bytes` under `file_name` and return where it ended up.
    async fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}

#[cfg(test)]
pub(crate) mod fixture {
    use std::sync::Mutex;

    use super::*;

    /// Sink keeping deliveries in memory.
    #[derive(Default)]
    pub struct MemorySink {
        deliveries: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl MemorySink {
        pub fn deliveries(&self) -> Vec<(String, Vec<u8>)> {
            self.deliveries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ExportSink for MemorySink {
        async fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
            self.deliveries
                .lock()
                .unwrap()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(format!("memory://{file_name}"))
        }
    }
}
