/// ITU-R BT.601 luma coefficient for the red channel.
pub const LUMA_R: f64 = 0.2989;

/// ITU-R BT.601 luma coefficient for the green channel.
pub const LUMA_G: f64 = 0.5870;

/// ITU-R BT.601 luma coefficient for the blue channel.
pub const LUMA_B: f64 = 0.1140;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Number of channels in a grayscale frame.
pub const MONO_CHANNEL_COUNT: usize = 1;

/// Output resolution used when none is requested.
pub const DEFAULT_DPI: u32 = 100;

/// Resolution at which one composite pixel maps to one output pixel.
pub const BASE_DPI: u32 = 100;

/// Default frame sampling stride.
pub const DEFAULT_INTERVAL: usize = 1;
