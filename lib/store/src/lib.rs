pub mod artifacts;
pub mod catalog;
pub mod store;

pub use artifacts::{load_artifacts, ArtifactBundle};
pub use catalog::load_catalog;
pub use store::{ArtifactStore, StoreConfig};
