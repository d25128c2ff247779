mod backprop;
mod buffers;
mod linear;
mod options;
mod pingpong;
mod trainer;

pub use self::{
    backprop::*,
    buffers::*,
    linear::*,
    options::*,
    pingpong::*,
    trainer::*,
};
