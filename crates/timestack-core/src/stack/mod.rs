pub mod builder;
pub mod crop;
pub mod interval;
pub mod luma;
pub mod reduce;

pub use builder::build_stack;
pub use crop::{crop_stack, FrameRange, Roi};
pub use interval::{sample_interval, validate_interval};
pub use luma::{reduce_channels, to_luma};
pub use reduce::{temporal_reduce, ReduceMethod};
