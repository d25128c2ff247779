use crate::{
    buffer::{ForwardCache, WeightBuffer},
    data::FEATURE_COUNT,
    error::{try_with_capacity, AllocSite, Error, Result},
    func::ActivationFn,
    layer::{dot, forward_hidden},
};

/// Topology of a network with `layer_count` hidden layers of equal width.
///
/// Weight layer `l < layer_count` holds `layer_node_count` rows of
/// `input_width(l)` weights; weight layer `layer_count` is the single output
/// unit. With zero hidden layers the only weight layer is a linear unit over
/// the raw features.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetConfig {
    feature_count: usize,
    layer_count: usize,
    layer_node_count: usize,
    activation_fn: ActivationFn,
}

impl NetConfig {

    pub fn new(feature_count: usize, layer_count: usize, layer_node_count: usize) -> Result<Self> {
        if feature_count == 0 {
            return Err(Error::Config("feature count must be greater than 0".to_string()));
        }
        if layer_count > 0 && layer_node_count == 0 {
            return Err(Error::Config("layer node count must be greater than 0".to_string()));
        }
        Ok(NetConfig {
            feature_count,
            layer_count,
            layer_node_count: if layer_count == 0 { 0 } else { layer_node_count },
            activation_fn: ActivationFn::standard_logistic_sigmoid(),
        })
    }

    pub fn linear() -> Self {
        NetConfig {
            feature_count: FEATURE_COUNT,
            layer_count: 0,
            layer_node_count: 0,
            activation_fn: ActivationFn::standard_logistic_sigmoid(),
        }
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }

    #[inline]
    pub fn layer_node_count(&self) -> usize {
        self.layer_node_count
    }

    #[inline]
    pub fn activation_fn(&self) -> ActivationFn {
        self.activation_fn
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        self.layer_count == 0
    }

    /// Hidden layers plus the output unit.
    #[inline]
    pub fn num_weight_layers(&self) -> usize {
        self.layer_count + 1
    }

    /// Number of values each unit of weight layer `layer` consumes.
    #[inline]
    pub fn input_width(&self, layer: usize) -> usize {
        if layer == 0 {
            self.feature_count
        } else {
            self.layer_node_count + 1
        }
    }

    /// Number of units in weight layer `layer`.
    #[inline]
    pub fn units(&self, layer: usize) -> usize {
        if layer == self.layer_count {
            1
        } else {
            self.layer_node_count
        }
    }

    /// Width of one forward-cache row, bias slot included.
    #[inline]
    pub fn cache_width(&self) -> usize {
        self.layer_node_count + 1
    }

    /// Row sizes of the weight buffer. Sizes that cannot be represented are
    /// reported as running out of memory at `site`.
    pub fn weight_layer_sizes(&self, site: AllocSite) -> Result<Vec<usize>> {
        let out_of_memory = || Error::OutOfMemory(site);
        let num_weight_layers = self.layer_count.checked_add(1).ok_or_else(out_of_memory)?;
        let hidden_input_width = self.layer_node_count.checked_add(1).ok_or_else(out_of_memory)?;
        let mut sizes = try_with_capacity(num_weight_layers, site)?;
        for layer in 0..num_weight_layers {
            let input_width = if layer == 0 { self.feature_count } else { hidden_input_width };
            sizes.push(self.units(layer).checked_mul(input_width).ok_or_else(out_of_memory)?);
        }
        Ok(sizes)
    }

    /// Closed form of the flat weight count, `None` when it overflows `usize`.
    pub fn weight_buffer_size(&self) -> Option<usize> {
        let f = self.feature_count;
        let n = self.layer_node_count;
        if self.layer_count == 0 {
            return Some(f);
        }
        let n1 = n.checked_add(1)?;
        let hidden = (self.layer_count - 1).checked_mul(n)?.checked_mul(n1)?;
        n.checked_mul(f)?.checked_add(hidden)?.checked_add(n1)
    }

    /// Runs the forward pass of one example, leaving every hidden activation in
    /// `cache`, and returns the raw output.
    pub fn forward_into_cache(&self, weights: &WeightBuffer, input: &[f64], cache: &mut ForwardCache) -> f64 {

        debug_assert_eq!(input.len(), self.feature_count);
        debug_assert_eq!(Some(weights.size()), self.weight_buffer_size());

        if self.is_linear() {
            return dot(weights.layer(0), input);
        }

        forward_hidden(self.activation_fn, weights.layer(0), self.input_width(0), input, cache.layer_mut(0));
        for layer in 1..self.layer_count {
            let (previous, current) = cache.split_layers(layer - 1, layer);
            forward_hidden(self.activation_fn, weights.layer(layer), self.input_width(layer), previous, current);
        }
        dot(weights.layer(self.layer_count), cache.layer(self.layer_count - 1))
    }

}
