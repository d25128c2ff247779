use crate::utils::square;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ErrorFn {
    SquaredError,
    /// Logistic loss on the margin `expected * actual`.
    LogisticMargin,
}

impl ErrorFn {

    pub fn get_error(&self, expected: f64, actual: f64) -> f64 {
        match self {
            ErrorFn::SquaredError => 0.5 * square(expected - actual),
            ErrorFn::LogisticMargin => f64::ln(1.0 + f64::exp(-expected * actual)),
        }
    }

    pub fn get_error_derivative(&self, expected: f64, actual: f64) -> f64 {
        match self {
            ErrorFn::SquaredError => actual - expected,
            ErrorFn::LogisticMargin => {
                let e = f64::exp(-expected * actual);
                -expected * e / (1.0 + e)
            },
        }
    }

}
