//! Shared value types: node identity, spatial transforms, colors.

mod types;

pub use types::{Color, NodeId, Transform};
