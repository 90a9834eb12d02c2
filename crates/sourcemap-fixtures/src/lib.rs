pub mod builder;
pub mod files;
pub mod vlq;

pub use builder::{MapBuilder, Mapping};
pub use files::FixtureDir;
