mod row;
mod weight;
mod cache;

pub use self::{
    row::*,
    weight::*,
    cache::*,
};
