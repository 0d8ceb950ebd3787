//! Named, typed shader parameters captured by value at draw time.

mod types;
mod value;

pub use types::UniformType;
pub use value::{Uniform, UniformPayload, UniformValue};
