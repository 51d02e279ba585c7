pub mod mock;
pub mod routed;
