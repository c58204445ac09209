use anyhow::{Context, Result};
use image::{imageops, ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use std::str::FromStr;

// --- colors ---

/// A marker color painted into the output, parsed from "r,g,b".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn to_pixel(self) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, 255])
    }
}

#[derive(Debug, thiserror::Error)]
#[error("expected a color as r,g,b (got {0:?})")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',').map(|p| p.trim().parse::<u8>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) => Ok(Rgb(r, g, b)),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

// --- target profiles ---

/// Marker colors and width bound supplied by the user instead of a named
/// application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomProfile {
    pub dark_color: Rgb,
    pub light_color: Rgb,
    pub max_width: u32,
}

/// Display constraints of the application the output is meant for: the color
/// its dark theme renders legibly, the color its light theme renders legibly,
/// and how wide an image it will show without downscaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetProfile {
    /// Discord: dark-theme background #36393f, white, 268px preview width.
    Discord,
    Custom(CustomProfile),
}

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("only the custom profile may be modified")]
    ImmutableProfile,
    #[error("source images differ in size ({dark_w}x{dark_h} vs {light_w}x{light_h})")]
    DimensionMismatch {
        dark_w: u32,
        dark_h: u32,
        light_w: u32,
        light_h: u32,
    },
}

impl TargetProfile {
    /// Color painted where the dark-theme source has content.
    pub fn dark_color(&self) -> Rgb {
        match self {
            TargetProfile::Discord => Rgb(0x36, 0x39, 0x3f),
            TargetProfile::Custom(c) => c.dark_color,
        }
    }

    /// Color painted where the light-theme source has content.
    pub fn light_color(&self) -> Rgb {
        match self {
            TargetProfile::Discord => Rgb(0xff, 0xff, 0xff),
            TargetProfile::Custom(c) => c.light_color,
        }
    }

    /// Upper bound on output width before downscaling kicks in.
    pub fn max_width(&self) -> u32 {
        match self {
            TargetProfile::Discord => 268,
            TargetProfile::Custom(c) => c.max_width,
        }
    }

    pub fn set_dark_color(&mut self, color: Rgb) -> Result<(), ComposeError> {
        match self {
            TargetProfile::Custom(c) => {
                c.dark_color = color;
                Ok(())
            }
            _ => Err(ComposeError::ImmutableProfile),
        }
    }

    pub fn set_light_color(&mut self, color: Rgb) -> Result<(), ComposeError> {
        match self {
            TargetProfile::Custom(c) => {
                c.light_color = color;
                Ok(())
            }
            _ => Err(ComposeError::ImmutableProfile),
        }
    }

    pub fn set_max_width(&mut self, max_width: u32) -> Result<(), ComposeError> {
        match self {
            TargetProfile::Custom(c) => {
                c.max_width = max_width;
                Ok(())
            }
            _ => Err(ComposeError::ImmutableProfile),
        }
    }
}

// --- scaling ---

/// Fit both sources under `max_width`, preserving the dark source's aspect
/// ratio. Already-fitting images pass through untouched (downscaling only,
/// never upscaling); otherwise both are resampled bilinearly to the same
/// target so corresponding pixel coordinates stay aligned.
pub fn fit_to_width(dark: RgbaImage, light: RgbaImage, max_width: u32) -> (RgbaImage, RgbaImage) {
    let (w, h) = dark.dimensions();
    let target_w = max_width;
    let target_h = (h as f64 / w as f64 * target_w as f64).round() as u32;

    if w <= target_w && h <= target_h {
        return (dark, light);
    }

    let dark = imageops::resize(&dark, target_w, target_h, imageops::FilterType::Triangle);
    let light = imageops::resize(&light, target_w, target_h, imageops::FilterType::Triangle);
    (dark, light)
}

// --- interleaving strategies ---

/// Per-pixel rule for picking which theme's marker color (if any) goes at
/// each output coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Checkerboard: even cells favor the dark source, odd cells the light
    /// source, each falling back to the other when its own pixel is empty.
    Weave,
    /// Row-alternating: each row flips between sources on every content hit,
    /// with the starting bias offset by row parity.
    Fair,
}

// A source pixel carries content unless it is fully transparent.
fn has_content(px: &Rgba<u8>) -> bool {
    px.0[3] != 0
}

impl Strategy {
    /// Interleave two same-sized sources into a fresh output. Pixels neither
    /// source claims stay fully transparent.
    pub fn apply(self, dark: &RgbaImage, light: &RgbaImage, profile: &TargetProfile) -> RgbaImage {
        debug_assert_eq!(dark.dimensions(), light.dimensions());
        match self {
            Strategy::Weave => weave(dark, light, profile),
            Strategy::Fair => fair(dark, light, profile),
        }
    }
}

fn weave(dark: &RgbaImage, light: &RgbaImage, profile: &TargetProfile) -> RgbaImage {
    let (w, h) = dark.dimensions();
    let mut out = RgbaImage::new(w, h);

    let light_marker = profile.light_color().to_pixel();
    let dark_marker = profile.dark_color().to_pixel();

    for y in 0..h {
        for x in 0..w {
            if (x + y) % 2 == 0 {
                if has_content(dark.get_pixel(x, y)) {
                    out.put_pixel(x, y, light_marker);
                } else if has_content(light.get_pixel(x, y)) {
                    out.put_pixel(x, y, dark_marker);
                }
            } else if has_content(light.get_pixel(x, y)) {
                out.put_pixel(x, y, dark_marker);
            } else if has_content(dark.get_pixel(x, y)) {
                out.put_pixel(x, y, light_marker);
            }
        }
    }

    out
}

fn fair(dark: &RgbaImage, light: &RgbaImage, profile: &TargetProfile) -> RgbaImage {
    let (w, h) = dark.dimensions();
    let mut out = RgbaImage::new(w, h);

    let light_marker = profile.light_color().to_pixel();
    let dark_marker = profile.dark_color().to_pixel();

    for y in 0..h {
        // Odd rows start biased toward the light source so neither theme
        // dominates the first column.
        let mut last = y % 2;
        for x in 0..w {
            if last % 2 == 0 {
                if has_content(dark.get_pixel(x, y)) {
                    out.put_pixel(x, y, light_marker);
                    last += 1;
                } else if has_content(light.get_pixel(x, y)) {
                    out.put_pixel(x, y, dark_marker);
                }
            } else if has_content(light.get_pixel(x, y)) {
                out.put_pixel(x, y, dark_marker);
                last += 1;
            } else if has_content(dark.get_pixel(x, y)) {
                out.put_pixel(x, y, light_marker);
            }
        }
    }

    out
}

// --- compositor pipeline ---

/// Full pipeline: check the inputs line up, fit them under the profile's
/// width bound, then interleave with the chosen strategy.
pub fn compose(
    dark: RgbaImage,
    light: RgbaImage,
    profile: &TargetProfile,
    strategy: Strategy,
) -> Result<RgbaImage, ComposeError> {
    if dark.dimensions() != light.dimensions() {
        let (dark_w, dark_h) = dark.dimensions();
        let (light_w, light_h) = light.dimensions();
        return Err(ComposeError::DimensionMismatch {
            dark_w,
            dark_h,
            light_w,
            light_h,
        });
    }

    let (dark, light) = fit_to_width(dark, light, profile.max_width());
    Ok(strategy.apply(&dark, &light, profile))
}

// --- codec boundary ---

/// Decode an image file into an RGBA buffer.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("Failed to open input image: {}", path.display()))?
        .to_rgba8();
    Ok(img)
}

/// Encode `img` at `path` in the named format ("png", "jpeg", ...).
pub fn save_image(img: &RgbaImage, path: &Path, format: &str) -> Result<()> {
    let format = ImageFormat::from_extension(format)
        .with_context(|| format!("Unknown output format: {format}"))?;
    img.save_with_format(path, format)
        .with_context(|| format!("Failed to save output image: {}", path.display()))?;
    Ok(())
}
