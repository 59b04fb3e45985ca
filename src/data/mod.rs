pub mod exemplar;

pub use exemplar::{Dataset, Exemplar};
