use std::sync::Arc;
use walkshed_core::ports::{IsochroneProvider, PoiProvider};
use walkshed_lookup::LookupService;
use walkshed_store::ports::DurableStore;
use walkshed_store::MemoryFastStore;

/// Lookup service over type-erased providers, as wired by the server
pub type DynLookupService = LookupService<Arc<dyn PoiProvider>, Arc<dyn IsochroneProvider>>;

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<DynLookupService>,

    /// Fast tier, swept by the purge task
    pub fast_store: MemoryFastStore,

    /// Durable tier, swept by the purge task and probed by `/health`
    pub durable_store: Arc<dyn DurableStore>,
}

impl AppState {
    pub fn new(
        lookup: DynLookupService,
        fast_store: MemoryFastStore,
        durable_store: Arc<dyn DurableStore>,
    ) -> Self {
        Self {
            lookup: Arc::new(lookup),
            fast_store,
            durable_store,
        }
    }
}
