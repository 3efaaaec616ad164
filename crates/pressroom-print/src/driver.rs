// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Driver resolution.
//
// A driver resolver turns a driver name and device URI into the printer's
// native document format and raster capabilities.  The lifecycle only reads
// the native format; the capabilities feed the attribute catalog.

use pressroom_core::error::{CoreError, Result};

/// MIME type of PWG raster, the native format of every PWG driver.
pub const PWG_RASTER: &str = "image/pwg-raster";

/// The PWG reference drivers and their descriptions.
pub const PWG_DRIVERS: [(&str, &str); 10] = [
    ("pwg_2inch-203dpi-black_1", "PWG 2inch Label 203DPI Black"),
    ("pwg_2inch-300dpi-black_1", "PWG 2inch Label 300DPI Black"),
    ("pwg_4inch-203dpi-black_1", "PWG 4inch Label 203DPI Black"),
    ("pwg_4inch-300dpi-black_1", "PWG 4inch Label 300DPI Black"),
    ("pwg_common-300dpi-black_1", "PWG Office 300DPI Black"),
    ("pwg_common-300dpi-sgray_8", "PWG Office 300DPI sGray 8-bit"),
    ("pwg_common-300dpi-srgb_8", "PWG Office 300DPI sRGB 8-bit"),
    ("pwg_common-300dpi-600dpi-black_1", "PWG Office 300DPI 600DPI Black"),
    ("pwg_common-300dpi-600dpi-sgray_8", "PWG Office 300DPI 600DPI sGray 8-bit"),
    ("pwg_common-300dpi-600dpi-srgb_8", "PWG Office 300DPI 600DPI sRGB 8-bit"),
];

/// Raster colour space and bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    Black1,
    Sgray8,
    Srgb8,
}

impl ColorSpace {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "black_1" => Some(Self::Black1),
            "sgray_8" => Some(Self::Sgray8),
            "srgb_8" => Some(Self::Srgb8),
            _ => None,
        }
    }

    /// `print-color-mode-supported` keywords for this colour space.
    pub fn color_modes(&self) -> &'static [&'static str] {
        match self {
            Self::Black1 => &["bi-level", "monochrome"],
            Self::Sgray8 => &["auto", "monochrome"],
            Self::Srgb8 => &["auto", "color", "monochrome"],
        }
    }

    /// `print-color-mode-default` for this colour space.
    pub fn default_color_mode(&self) -> &'static str {
        match self {
            Self::Black1 | Self::Sgray8 => "monochrome",
            Self::Srgb8 => "auto",
        }
    }
}

/// Device capabilities reported by a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverCapabilities {
    /// Human-readable make and model.
    pub make_and_model: String,
    /// Media class token, e.g. `2inch` or `common`.
    pub media_class: String,
    /// Supported resolutions in dots per inch, ascending.
    pub resolutions_dpi: Vec<u32>,
    pub color_space: ColorSpace,
}

impl DriverCapabilities {
    /// Whether this driver targets label stock rather than office paper.
    pub fn is_label_printer(&self) -> bool {
        self.media_class.ends_with("inch")
    }
}

/// Result of resolving a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverData {
    /// The document format the device consumes natively, if any.
    pub native_format: Option<String>,
    pub capabilities: DriverCapabilities,
}

/// Resolves driver names to driver data.
pub trait DriverResolver: Send + Sync {
    fn resolve(&self, driver_name: &str, device_uri: &str) -> Result<DriverData>;
}

/// Resolver for the `pwg_<media>-<dpi>dpi[-<dpi>dpi]-<colorspace>` drivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PwgDriverResolver;

impl DriverResolver for PwgDriverResolver {
    fn resolve(&self, driver_name: &str, _device_uri: &str) -> Result<DriverData> {
        let make_and_model = PWG_DRIVERS
            .iter()
            .find(|(name, _)| *name == driver_name)
            .map(|(_, description)| (*description).to_string())
            .ok_or_else(|| CoreError::Driver(format!("unknown driver {driver_name:?}")))?;

        let capabilities = parse_pwg_driver(driver_name, make_and_model)?;
        Ok(DriverData {
            native_format: Some(PWG_RASTER.into()),
            capabilities,
        })
    }
}

/// Split a PWG driver name into its media, resolution, and colour tokens.
fn parse_pwg_driver(driver_name: &str, make_and_model: String) -> Result<DriverCapabilities> {
    let malformed = || CoreError::Driver(format!("malformed PWG driver name {driver_name:?}"));

    let body = driver_name.strip_prefix("pwg_").ok_or_else(malformed)?;
    let mut tokens: Vec<&str> = body.split('-').collect();
    if tokens.len() < 3 {
        return Err(malformed());
    }

    let color_space = tokens
        .pop()
        .and_then(ColorSpace::from_token)
        .ok_or_else(malformed)?;
    let media_class = tokens.remove(0).to_string();

    let mut resolutions_dpi = tokens
        .iter()
        .map(|token| token.strip_suffix("dpi").and_then(|dpi| dpi.parse::<u32>().ok()))
        .collect::<Option<Vec<u32>>>()
        .ok_or_else(malformed)?;
    resolutions_dpi.sort_unstable();

    Ok(DriverCapabilities {
        make_and_model,
        media_class,
        resolutions_dpi,
        color_space,
    })
}
