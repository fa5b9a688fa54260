pub mod meter;

pub use meter::{describe_reclaimed, SpaceMeter, SpaceSample};
