use itertools::zip_eq;

use crate::func::ActivationFn;

/// Dot product of two equal-length slices.
#[inline]
pub fn dot(weights: &[f64], input: &[f64]) -> f64 {
    zip_eq(weights, input).map(|(w, x)| w * x).sum()
}

/// Fully connected sigmoid layer over a flat weight row.
///
/// `weights` holds one row of `input_width` weights per node. `output[0]` is
/// pinned to 1 as the bias input of the next layer; node `n` lands in
/// `output[n + 1]`.
pub fn forward_hidden(
    activation_fn: ActivationFn,
    weights: &[f64],
    input_width: usize,
    input: &[f64],
    output: &mut [f64],
) {

    debug_assert_eq!(input.len(), input_width);
    debug_assert_eq!(weights.len(), input_width * (output.len() - 1));

    output[0] = 1.0;
    for (node_index, node_weights) in weights.chunks_exact(input_width).enumerate() {
        output[node_index + 1] = activation_fn.get_activation(dot(node_weights, input));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dot() {
        assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, -5.0, 6.0]), 12.0);
        assert_eq!(dot(&[], &[]), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_dot_length_mismatch() {
        dot(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn test_forward_hidden() {
        let weights = [0.5, -1.0, 2.0, 0.0, 1.0, 1.0];
        let input = [1.0, 0.25, 0.5];
        let mut output = [0.0; 3];
        forward_hidden(ActivationFn::standard_logistic_sigmoid(), &weights, 3, &input, &mut output);
        assert_eq!(output[0], 1.0);
        assert_abs_diff_eq!(output[1], 1.0 / (1.0 + f64::exp(-1.25)), epsilon = 1e-12);
        assert_abs_diff_eq!(output[2], 1.0 / (1.0 + f64::exp(-0.75)), epsilon = 1e-12);
    }

}
