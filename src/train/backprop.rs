use crate::{
    buffer::{ForwardCache, RowBuffer, WeightBuffer},
    func::ErrorFn,
    net::NetConfig,
};

/// Fills `deltas[l][n]`, the chain-rule factor between the raw output and the
/// pre-activation sum of hidden node `n` in layer `l`, walking from the last
/// hidden layer back to the first. `cache` must hold the raw activations of the
/// current example; it is only read.
pub fn compute_deltas(config: &NetConfig, weights: &WeightBuffer, cache: &ForwardCache, deltas: &mut RowBuffer) {

    let layer_count = config.layer_count();
    let node_count = config.layer_node_count();
    let activation_fn = config.activation_fn();

    debug_assert!(layer_count > 0);
    debug_assert_eq!(deltas.num_rows(), layer_count);

    {
        let z = cache.layer(layer_count - 1);
        let output_weights = weights.output_layer();
        let delta = deltas.get_row_mut(layer_count - 1);
        for node in 0..node_count {
            delta[node] = activation_fn.get_activation_derivative_from_output(z[node + 1])
                * output_weights[node + 1];
        }
    }

    let width = config.cache_width();
    for layer in (0..layer_count - 1).rev() {
        let z = cache.layer(layer);
        let next_weights = weights.layer(layer + 1);
        let (delta, next_delta) = deltas.split_rows_rev(layer, layer + 1);
        for node in 0..node_count {
            let mut sum = 0.0;
            for next_node in 0..node_count {
                sum += next_weights[next_node * width + node + 1] * next_delta[next_node];
            }
            delta[node] = activation_fn.get_activation_derivative_from_output(z[node + 1]) * sum;
        }
    }
}

/// Gradient of the raw output with respect to `w[layer][node][k]`, computed by
/// recursing forward to the output unit. Agrees with
/// `input_k * deltas[layer][node]` from [`compute_deltas`].
pub fn propagate(
    config: &NetConfig,
    weights: &WeightBuffer,
    cache: &ForwardCache,
    input: &[f64],
    layer: usize,
    node: usize,
    k: usize,
) -> f64 {
    let incoming = if layer == 0 {
        input[k]
    } else {
        cache.layer(layer - 1)[k]
    };
    incoming * chain(config, weights, cache, layer, node)
}

fn chain(config: &NetConfig, weights: &WeightBuffer, cache: &ForwardCache, layer: usize, node: usize) -> f64 {
    let derivative = config.activation_fn()
        .get_activation_derivative_from_output(cache.layer(layer)[node + 1]);
    if layer + 1 == config.layer_count() {
        derivative * weights.output_layer()[node + 1]
    } else {
        let sum: f64 = (0..config.layer_node_count())
            .map(|next_node| {
                weights.node(layer + 1, next_node)[node + 1]
                    * chain(config, weights, cache, layer + 1, next_node)
            })
            .sum();
        derivative * sum
    }
}

/// One stochastic squared-loss update of a network with hidden layers.
///
/// Reads only `current`, writes every weight of `next`, and returns the loss of
/// the example before the update.
pub fn network_step(
    config: &NetConfig,
    current: &WeightBuffer,
    next: &mut WeightBuffer,
    cache: &mut ForwardCache,
    deltas: &mut RowBuffer,
    input: &[f64],
    expected: f64,
    gamma0: f64,
) -> f64 {

    let layer_count = config.layer_count();
    let node_count = config.layer_node_count();

    let actual = config.forward_into_cache(current, input, cache);
    let error_signal = ErrorFn::SquaredError.get_error_derivative(expected, actual);
    let scale = gamma0 * error_signal;

    {
        let z_last = cache.layer(layer_count - 1);
        let output_weights = current.output_layer();
        let target = next.layer_mut(layer_count);
        for j in 0..z_last.len() {
            target[j] = output_weights[j] - scale * z_last[j];
        }
    }

    compute_deltas(config, current, cache, deltas);

    for layer in (0..layer_count).rev() {
        let layer_input: &[f64] = if layer == 0 {
            input
        } else {
            cache.layer(layer - 1)
        };
        let width = config.input_width(layer);
        let source = current.layer(layer);
        let target = next.layer_mut(layer);
        let delta = deltas.get_row(layer);
        for node in 0..node_count {
            let node_scale = scale * delta[node];
            let row = node * width;
            for k in 0..width {
                target[row + k] = source[row + k] - node_scale * layer_input[k];
            }
        }
    }

    ErrorFn::SquaredError.get_error(expected, actual)
}
