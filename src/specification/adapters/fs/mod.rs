//! YAML files on the local filesystem.

mod catalogue;

pub use catalogue::FileSpecificationCatalogue;
