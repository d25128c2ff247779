use crate::{
    buffer::RowBuffer,
    error::{AllocSite, Error, Result},
    net::NetConfig,
};

/// Post-activation value of every hidden node for the current example.
///
/// One row of `layer_node_count + 1` values per hidden layer; slot 0 of each
/// row is the synthetic bias activation and always holds 1.
#[derive(Clone, Debug)]
pub struct ForwardCache {
    buffer: RowBuffer,
}

impl ForwardCache {

    pub fn for_net(config: &NetConfig) -> Result<Self> {
        let width = config.layer_node_count().checked_add(1)
            .ok_or(Error::OutOfMemory(AllocSite::ForwardCache))?;
        let mut buffer = RowBuffer::new_with_uniform_rows(0.0, config.layer_count(), width, AllocSite::ForwardCache)?;
        for layer in 0..buffer.num_rows() {
            buffer.get_row_mut(layer)[0] = 1.0;
        }
        Ok(ForwardCache { buffer })
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.buffer.num_rows()
    }

    #[inline]
    pub fn layer(&self, layer: usize) -> &[f64] {
        self.buffer.get_row(layer)
    }

    #[inline]
    pub fn layer_mut(&mut self, layer: usize) -> &mut [f64] {
        self.buffer.get_row_mut(layer)
    }

    #[inline]
    pub fn split_layers(&mut self, previous: usize, current: usize) -> (&[f64], &mut [f64]) {
        self.buffer.split_rows(previous, current)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        self.buffer.get_buffer()
    }

}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bias_slots_pinned() {
        let config = NetConfig::new(5, 3, 4).unwrap();
        let cache = ForwardCache::for_net(&config).unwrap();
        assert_eq!(cache.num_layers(), 3);
        for layer in 0..3 {
            assert_eq!(cache.layer(layer), &[1., 0., 0., 0., 0.]);
        }
    }

    #[test]
    fn test_linear_has_no_layers() {
        let config = NetConfig::new(5, 0, 4).unwrap();
        let cache = ForwardCache::for_net(&config).unwrap();
        assert_eq!(cache.num_layers(), 0);
        assert!(cache.as_slice().is_empty());
    }

}
