use crate::{
    buffer::{ForwardCache, RowBuffer, WeightBuffer},
    error::{AllocSite, Result},
    net::NetConfig,
    stats::Stats,
};

/// Everything the engine needs besides the caller's weights, allocated once
/// before the first epoch.
pub struct TrainingBuffers {
    pub spare_weights: WeightBuffer,
    pub cache: ForwardCache,
    pub deltas: RowBuffer,
    pub error_stats: Stats,
}

impl TrainingBuffers {
    pub fn for_net(config: &NetConfig) -> Result<Self> {
        Ok(TrainingBuffers {
            spare_weights: WeightBuffer::allocate_at(config, AllocSite::SwapWeights)?,
            cache: ForwardCache::for_net(config)?,
            deltas: RowBuffer::new_with_uniform_rows(
                0.0,
                config.layer_count(),
                config.layer_node_count(),
                AllocSite::Deltas,
            )?,
            error_stats: Stats::new(),
        })
    }
}
