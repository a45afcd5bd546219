use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, TimestackError};
use crate::frame::{RawFrames, SourceInfo};

use super::FrameSource;

const FFPROBE: &str = "ffprobe";
const FFMPEG: &str = "ffmpeg";

#[derive(Deserialize)]
struct ProbeSideData {
    rotation: Option<f64>,
}

#[derive(Deserialize)]
struct ProbeTags {
    rotate: Option<String>,
}

#[derive(Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
    tags: Option<ProbeTags>,
}

impl ProbeStream {
    /// Display rotation in degrees, from the display matrix or the legacy tag.
    fn rotation(&self) -> f64 {
        self.side_data_list
            .iter()
            .find_map(|d| d.rotation)
            .or_else(|| {
                self.tags
                    .as_ref()
                    .and_then(|t| t.rotate.as_deref())
                    .and_then(|r| r.trim().parse().ok())
            })
            .unwrap_or(0.0)
    }
}

#[derive(Deserialize)]
struct ProbeFormat {
    format_name: Option<String>,
}

#[derive(Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Locations of the ffmpeg executables. The default resolves both via `PATH`.
#[derive(Clone, Debug)]
pub struct FfmpegTools {
    pub ffprobe: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self {
            ffprobe: PathBuf::from(FFPROBE),
            ffmpeg: PathBuf::from(FFMPEG),
        }
    }
}

/// Video reader backed by the `ffprobe` and `ffmpeg` executables.
///
/// Every frame of the first video stream is decoded to packed `rgb24`.
/// ffmpeg applies the stream's display rotation, so the reported
/// dimensions are the rotated ones.
pub struct FfmpegReader {
    info: SourceInfo,
    tools: FfmpegTools,
}

impl FfmpegReader {
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, FfmpegTools::default())
    }

    pub fn open_with(path: &Path, tools: FfmpegTools) -> Result<Self> {
        let out = Command::new(&tools.ffprobe)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(path)
            .output()
            .map_err(|e| {
                TimestackError::Decode(format!("failed to run {}: {e}", tools.ffprobe.display()))
            })?;
        if !out.status.success() {
            return Err(TimestackError::Decode(format!(
                "could not read metadata of '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let info = parse_probe(&out.stdout, path)?;
        debug!(
            format = %info.format,
            width = info.width,
            height = info.height,
            declared_frames = ?info.declared_frames,
            "Probed video stream"
        );
        Ok(Self { info, tools })
    }
}

impl FrameSource for FfmpegReader {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read_frames(&mut self) -> Result<RawFrames> {
        let out = Command::new(&self.tools.ffmpeg)
            .args(["-v", "error", "-i"])
            .arg(&self.info.filename)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .output()
            .map_err(|e| {
                TimestackError::Decode(format!("failed to run {}: {e}", self.tools.ffmpeg.display()))
            })?;
        if !out.status.success() {
            return Err(TimestackError::Decode(format!(
                "video decode failed for '{}': {}",
                self.info.filename.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let height = self.info.height as usize;
        let width = self.info.width as usize;
        let frame_bytes = height * width * COLOR_CHANNEL_COUNT;
        let bytes = out.stdout;
        let trailing = bytes.len() % frame_bytes;
        if trailing != 0 {
            return Err(TimestackError::Decode(format!(
                "ffmpeg output for '{}' ends with {trailing} bytes of a partial {width}x{height} frame",
                self.info.filename.display()
            )));
        }

        Ok(RawFrames {
            frame_count: bytes.len() / frame_bytes,
            bytes,
            height,
            width,
            channels: COLOR_CHANNEL_COUNT,
        })
    }
}

fn parse_probe(json: &[u8], path: &Path) -> Result<SourceInfo> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| TimestackError::Decode(format!("ffprobe output is not valid JSON: {e}")))?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            TimestackError::Decode(format!("no video stream found in '{}'", path.display()))
        })?;
    let width = video
        .width
        .ok_or_else(|| TimestackError::Decode("missing video width from ffprobe".into()))?;
    let height = video
        .height
        .ok_or_else(|| TimestackError::Decode("missing video height from ffprobe".into()))?;
    if width == 0 || height == 0 {
        return Err(TimestackError::Decode(format!(
            "invalid video dimensions: {width}x{height}"
        )));
    }

    let rotation = video.rotation();
    let (width, height) = if (rotation.round() as i64).rem_euclid(180) == 90 {
        debug!(rotation, "Stream is rotated a quarter turn, swapping dimensions");
        (height, width)
    } else {
        (width, height)
    };

    Ok(SourceInfo {
        filename: path.to_path_buf(),
        format: parsed
            .format
            .and_then(|f| f.format_name)
            .unwrap_or_else(|| "unknown".into()),
        width,
        height,
        channels: COLOR_CHANNEL_COUNT,
        declared_frames: video.nb_frames.as_deref().and_then(|n| n.parse().ok()),
        frame_rate: video.r_frame_rate.as_deref().and_then(parse_ff_ratio),
    })
}

/// Parse an ffmpeg rational such as `30000/1001`.
fn parse_ff_ratio(s: &str) -> Option<f64> {
    let (num, den) = s.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    (den != 0.0).then_some(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_picks_first_video_stream() {
        let json = br#"{
            "streams": [
                {"codec_type": "audio"},
                {"codec_type": "video", "width": 640, "height": 480,
                 "r_frame_rate": "30000/1001", "nb_frames": "120"}
            ],
            "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2"}
        }"#;
        let info = parse_probe(json, Path::new("clip.mp4")).unwrap();
        assert_eq!((info.width, info.height), (640, 480));
        assert_eq!(info.channels, 3);
        assert_eq!(info.declared_frames, Some(120));
        assert!((info.frame_rate.unwrap() - 29.97).abs() < 0.01);
        assert_eq!(info.format, "mov,mp4,m4a,3gp,3g2,mj2");
    }

    #[test]
    fn probe_without_video_stream_is_a_decode_error() {
        let json = br#"{"streams": [{"codec_type": "audio"}]}"#;
        let err = parse_probe(json, Path::new("song.mp3")).unwrap_err();
        assert!(matches!(err, TimestackError::Decode(_)));
    }

    #[test]
    fn probe_rejects_garbage() {
        assert!(parse_probe(b"not json", Path::new("x.avi")).is_err());
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 1920, "height": 1080,
                 "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]}
            ]
        }"#;
        let info = parse_probe(json, Path::new("phone.mp4")).unwrap();
        assert_eq!((info.width, info.height), (1080, 1920));
    }

    #[test]
    fn legacy_rotate_tag_swaps_dimensions() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 640, "height": 360, "tags": {"rotate": "270"}}
            ]
        }"#;
        let info = parse_probe(json, Path::new("old.mov")).unwrap();
        assert_eq!((info.width, info.height), (360, 640));
    }

    #[test]
    fn half_turn_keeps_dimensions() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "width": 640, "height": 360,
                 "side_data_list": [{"rotation": 180}]}
            ]
        }"#;
        let info = parse_probe(json, Path::new("flip.mp4")).unwrap();
        assert_eq!((info.width, info.height), (640, 360));
    }

    #[test]
    fn ratio_parsing() {
        assert_eq!(parse_ff_ratio("25/1"), Some(25.0));
        assert_eq!(parse_ff_ratio("0/0"), None);
        assert_eq!(parse_ff_ratio("abc"), None);
    }
}
