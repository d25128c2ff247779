use crate::{
    buffer::RowBuffer,
    error::{AllocSite, Result},
    initializer::RandomInitializer,
    net::NetConfig,
};

/// Every weight of a network in one contiguous arena, one row per weight
/// layer. Hidden node `n` of layer `l` owns
/// `layer(l)[n * input_width(l)..(n + 1) * input_width(l)]`.
#[derive(Clone, Debug)]
pub struct WeightBuffer {
    config: NetConfig,
    buffer: RowBuffer,
}

impl WeightBuffer {

    /// Allocates exactly `config.weight_buffer_size()` zeroed weights.
    pub fn allocate(config: &NetConfig) -> Result<Self> {
        Self::allocate_at(config, AllocSite::Weights)
    }

    pub(crate) fn allocate_at(config: &NetConfig, site: AllocSite) -> Result<Self> {
        let buffer = RowBuffer::new_with_row_sizes(0.0, config.weight_layer_sizes(site)?, site)?;
        debug_assert_eq!(Some(buffer.buffer_len()), config.weight_buffer_size());
        Ok(WeightBuffer {
            config: *config,
            buffer,
        })
    }

    /// Builds a buffer from explicit values, laid out as described on the type.
    pub fn from_values(config: &NetConfig, values: &[f64]) -> Result<Self> {
        let mut weights = Self::allocate(config)?;
        if values.len() != weights.size() {
            return Err(crate::error::Error::Config(format!(
                "expected {} weights, got {}", weights.size(), values.len()
            )));
        }
        weights.buffer.get_buffer_mut().copy_from_slice(values);
        Ok(weights)
    }

    pub fn fill(&mut self, initializer: &mut RandomInitializer) {
        initializer.fill(self.buffer.get_buffer_mut());
    }

    #[inline]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.buffer.buffer_len()
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
    pub fn output_layer(&self) -> &[f64] {
        self.buffer.get_last_row()
    }

    /// Weights of one unit in weight layer `layer`.
    #[inline]
    pub fn node(&self, layer: usize, node: usize) -> &[f64] {
        let width = self.config.input_width(layer);
        &self.layer(layer)[node * width..(node + 1) * width]
    }

    #[inline]
    pub fn layer_offsets(&self) -> &[(usize, usize)] {
        self.buffer.row_offsets_and_sizes()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        self.buffer.get_buffer()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const f64 {
        self.buffer.get_buffer().as_ptr()
    }

    pub fn copy_into(&self, other: &mut WeightBuffer) {
        self.buffer.copy_into(&mut other.buffer);
    }

}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_allocate_size_round_trip() {
        for layer_count in 0..4 {
            for layer_node_count in 1..5 {
                let config = NetConfig::new(13, layer_count, layer_node_count).unwrap();
                let weights = WeightBuffer::allocate(&config).unwrap();
                assert_eq!(Some(weights.size()), config.weight_buffer_size());
                assert_eq!(weights.layer_offsets().len(), layer_count + 1);
                let (last_offset, last_width) = *weights.layer_offsets().last().unwrap();
                assert_eq!(last_offset + last_width, weights.size());
            }
        }
    }

    #[test]
    fn test_layout() {
        let config = NetConfig::new(3, 2, 2).unwrap();
        let values: Vec<f64> = (0..config.weight_buffer_size().unwrap()).map(|i| i as f64).collect();
        let weights = WeightBuffer::from_values(&config, &values).unwrap();
        assert_eq!(weights.layer_offsets(), &[(0, 6), (6, 6), (12, 3)]);
        assert_eq!(weights.node(0, 1), &[3., 4., 5.]);
        assert_eq!(weights.node(1, 0), &[6., 7., 8.]);
        assert_eq!(weights.node(2, 0), &[12., 13., 14.]);
        assert_eq!(weights.output_layer(), &[12., 13., 14.]);
    }

    #[test]
    fn test_from_values_wrong_length() {
        let config = NetConfig::new(3, 0, 1).unwrap();
        assert!(WeightBuffer::from_values(&config, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_fill() {
        let config = NetConfig::new(20, 1, 4).unwrap();
        let mut weights = WeightBuffer::allocate(&config).unwrap();
        weights.fill(&mut RandomInitializer::new_with_seed("fill"));
        assert!(weights.as_slice().iter().all(|&w| w >= -1.0 && w <= 1.0));
        assert!(weights.as_slice().iter().any(|&w| w != 0.0));

        let mut same = WeightBuffer::allocate(&config).unwrap();
        same.fill(&mut RandomInitializer::new_with_seed("fill"));
        assert_eq!(weights.as_slice(), same.as_slice());
    }

}
