use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use ndarray::ArrayView2;
use tracing::info;

use crate::consts::{BASE_DPI, COLOR_CHANNEL_COUNT, DEFAULT_DPI, MONO_CHANNEL_COUNT};
use crate::error::{Result, TimestackError};
use crate::frame::{Composite, CompositeImage};

/// Colormap applied to single-channel composites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Colormap {
    #[default]
    Gray,
}

impl Colormap {
    const LEVELS: f64 = 256.0;

    /// Map a normalized value in `[0, 1]` to an 8-bit intensity.
    pub fn apply(&self, level: f64) -> u8 {
        match self {
            Self::Gray => (level.clamp(0.0, 1.0) * Self::LEVELS).floor().min(255.0) as u8,
        }
    }
}

/// Fixed rendering parameters handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output resolution; `BASE_DPI` keeps one output pixel per composite pixel.
    pub dpi: u32,
    pub colormap: Colormap,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            colormap: Colormap::Gray,
        }
    }
}

impl RenderOptions {
    pub fn with_dpi(dpi: Option<u32>) -> Self {
        Self {
            dpi: dpi.unwrap_or(DEFAULT_DPI),
            ..Self::default()
        }
    }

    /// Output size for a `width x height` composite.
    pub fn output_size(&self, width: usize, height: usize) -> (u32, u32) {
        let scale = |n: usize| -> u32 {
            let scaled = (n as f64 * self.dpi as f64 / BASE_DPI as f64).round();
            scaled.clamp(1.0, u32::MAX as f64) as u32
        };
        (scale(width), scale(height))
    }
}

/// Build the raster for a composite: single-channel data goes through the
/// colormap after min/max normalization, 3-channel integer data is kept as RGB.
pub fn render_image(composite: &CompositeImage, options: &RenderOptions) -> Result<DynamicImage> {
    if options.dpi == 0 {
        return Err(TimestackError::Render("dpi must be at least 1".into()));
    }

    let image = match composite {
        CompositeImage::Raw(c) if c.channels() == COLOR_CHANNEL_COUNT => DynamicImage::ImageRgb8(rgb_image(c)?),
        CompositeImage::Raw(c) if c.channels() == MONO_CHANNEL_COUNT => {
            let plane = c.plane(0).mapv(f64::from);
            DynamicImage::ImageLuma8(colormapped(plane.view(), options.colormap)?)
        }
        CompositeImage::Luma(c) if c.channels() == MONO_CHANNEL_COUNT => {
            DynamicImage::ImageLuma8(colormapped(c.plane(0), options.colormap)?)
        }
        other => {
            return Err(TimestackError::Render(format!(
                "cannot render a {}-channel composite",
                other.channels()
            )));
        }
    };

    let (w, h) = options.output_size(composite.width(), composite.height());
    if (w, h) == (image.width(), image.height()) {
        Ok(image)
    } else {
        Ok(image.resize_exact(w, h, FilterType::Nearest))
    }
}

/// Render a composite and write it to `path`, format chosen by extension.
pub fn save_composite(composite: &CompositeImage, path: &Path, options: &RenderOptions) -> Result<()> {
    let format = output_format(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(TimestackError::Render(format!(
                "output directory '{}' does not exist",
                parent.display()
            )));
        }
    }

    let image = render_image(composite, options)?;
    image
        .save_with_format(path, format)
        .map_err(|e| TimestackError::Render(format!("cannot write '{}': {e}", path.display())))?;

    info!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        dpi = options.dpi,
        "Saved composite"
    );
    Ok(())
}

/// Pick the encoder from the file extension.
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => Ok(ImageFormat::Png),
        Some("jpg" | "jpeg") => Ok(ImageFormat::Jpeg),
        Some("tif" | "tiff") => Ok(ImageFormat::Tiff),
        Some("bmp") => Ok(ImageFormat::Bmp),
        Some(ext) => Err(TimestackError::Render(format!(
            "unsupported output extension '.{ext}'"
        ))),
        None => Err(TimestackError::Render(format!(
            "output path '{}' has no extension",
            path.display()
        ))),
    }
}

fn rgb_image(composite: &Composite<u8>) -> Result<RgbImage> {
    let (w, h) = (composite.width() as u32, composite.height() as u32);
    let pixels: Vec<u8> = composite.data.iter().copied().collect();
    RgbImage::from_raw(w, h, pixels)
        .ok_or_else(|| TimestackError::Render("composite buffer does not match its dimensions".into()))
}

fn colormapped(plane: ArrayView2<'_, f64>, colormap: Colormap) -> Result<GrayImage> {
    let (h, w) = plane.dim();
    let (lo, hi) = plane
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return Err(TimestackError::Render("composite has no finite values".into()));
    }
    let span = hi - lo;

    let mut img = GrayImage::new(w as u32, h as u32);
    for ((row, col), &v) in plane.indexed_iter() {
        let level = if span > 0.0 { (v - lo) / span } else { 0.0 };
        img.put_pixel(col as u32, row as u32, Luma([colormap.apply(level)]));
    }
    Ok(img)
}
