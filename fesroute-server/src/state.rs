use std::sync::Arc;

use fesroute_core::prelude::{
    AxisRecord, Error, RoadNetwork, RoadSegment, RoutingConfig, segments_from_records,
};
use tokio::sync::RwLock;

/// Axes and the network built from them, replaced as a whole
#[derive(Debug, Default)]
pub struct Snapshot {
    pub segments: Vec<RoadSegment>,
    pub network: RoadNetwork,
}

impl Snapshot {
    pub fn build(records: &[AxisRecord], config: &RoutingConfig) -> Result<Self, Error> {
        let segments = segments_from_records(records, config)?;
        let network = RoadNetwork::from_segments(&segments);
        Ok(Self { segments, network })
    }
}

/// Shared handler state
///
/// Queries clone the current `Arc<Snapshot>` and release the lock before any
/// routing work, so a rebuild never waits on a running query.
#[derive(Clone)]
pub struct AppState {
    pub routing: Arc<RoutingConfig>,
    snapshot: Arc<RwLock<Arc<Snapshot>>>,
}

impl AppState {
    pub fn new(routing: RoutingConfig, snapshot: Snapshot) -> Self {
        Self {
            routing: Arc::new(routing),
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub async fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    pub async fn replace(&self, snapshot: Snapshot) {
        *self.snapshot.write().await = Arc::new(snapshot);
    }
}
