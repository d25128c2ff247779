mod activation;
mod error;
mod learningrate;

pub use self::{
    activation::*,
    error::*,
    learningrate::*,
};
