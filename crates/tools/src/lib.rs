//! Developer Tooling: scene inspector and node tree listings.
//!
//! # Invariants
//! - Tools only read; nothing here mutates a scene or world.

mod inspector;

pub use inspector::{NodeInfo, SceneInspector, SceneSummary, WorldSummary};

pub fn crate_info() -> &'static str {
    "roomscene-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
