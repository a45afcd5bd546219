mod common;

use approx::assert_relative_eq;
use ndarray::Array4;
use timestack_core::error::TimestackError;
use timestack_core::frame::{FrameStack, PixelStack};
use timestack_core::stack::{reduce_channels, to_luma};

#[test]
fn test_bt601_weights() {
    let mut data = Array4::<u8>::zeros((1, 1, 3, 3));
    data[[0, 0, 0, 0]] = 100; // pure red
    data[[0, 0, 1, 1]] = 100; // pure green
    data[[0, 0, 2, 2]] = 100; // pure blue
    let luma = to_luma(&FrameStack::new(data)).unwrap();

    assert_eq!(luma.channels(), 1);
    assert_relative_eq!(luma.data[[0, 0, 0, 0]], 29.89, epsilon = 1e-9);
    assert_relative_eq!(luma.data[[0, 0, 1, 0]], 58.70, epsilon = 1e-9);
    assert_relative_eq!(luma.data[[0, 0, 2, 0]], 11.40, epsilon = 1e-9);
}

#[test]
fn test_no_rounding_or_clamping() {
    let data = Array4::from_elem((1, 1, 1, 3), 255u8);
    let luma = to_luma(&FrameStack::new(data)).unwrap();
    // 0.9999 * 255, kept fractional
    assert_relative_eq!(luma.data[[0, 0, 0, 0]], 254.9745, epsilon = 1e-9);
}

#[test]
fn test_equal_channels_scale_by_weight_sum() {
    let stack = common::ramp_stack(10, 4, 4, 3);
    let luma = to_luma(&stack).unwrap();
    assert_eq!(luma.frame_count(), 10);
    for t in 0..10 {
        assert_relative_eq!(luma.data[[t, 2, 3, 0]], 0.9999 * t as f64, epsilon = 1e-9);
    }
}

#[test]
fn test_single_channel_rejected() {
    let stack = common::ramp_stack(3, 2, 2, 1);
    let err = to_luma(&stack).unwrap_err();
    assert!(
        matches!(err, TimestackError::InvalidChannelCount { channels: 1, .. }),
        "{err}"
    );
    assert!(reduce_channels(stack, true).is_err());
}

#[test]
fn test_flag_off_passes_stack_through() {
    let stack = common::noise_stack(3, 2, 2, 3, 9);
    match reduce_channels(stack.clone(), false).unwrap() {
        PixelStack::Raw(out) => assert_eq!(out, stack),
        PixelStack::Luma(_) => panic!("grayscale applied with flag off"),
    }
}

#[test]
fn test_flag_off_keeps_single_channel() {
    let stack = common::ramp_stack(3, 2, 2, 1);
    let out = reduce_channels(stack, false).unwrap();
    assert_eq!(out.channels(), 1);
    assert!(matches!(out, PixelStack::Raw(_)));
}
