pub mod dense;

pub use dense::{ForwardCache, Layer};
