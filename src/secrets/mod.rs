//! Kubernetes Secret fetching and template utilities

mod accessor;
mod template;

pub use accessor::*;
pub use template::*;
