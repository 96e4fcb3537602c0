//! Packs per-species timelines into an RGB raster and encodes it as PNG.
//!
//! Row `i` of an atlas is the timeline of `mapping.symbols()[i]`; column `x`
//! is day `x` of the derived series.

use crate::error::{AtlasError, Result};
use crate::mapping::SpeciesMapping;
use foliage_phenology::{
    resolve_timeline, DerivedSeries, LocationModifiers, Rgb, SpeciesRegistry,
};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use rayon::prelude::*;

/// An uncompressed atlas, row-major RGB8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasRaster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl AtlasRaster {
    /// Stack equal-length color rows into a raster.
    pub fn from_rows(rows: &[Vec<Rgb>]) -> Result<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(AtlasError::InvalidRaster("raster has no pixels".to_string()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(AtlasError::InvalidRaster(format!(
                "row {} has {} days, expected {}",
                i,
                row.len(),
                width
            )));
        }
        let pixels: Vec<u8> = rows
            .iter()
            .flat_map(|row| row.iter().flat_map(|c| c.to_array()))
            .collect();
        let width = u32::try_from(width)
            .map_err(|_| AtlasError::InvalidRaster(format!("width {} too large", width)))?;
        let height = u32::try_from(rows.len())
            .map_err(|_| AtlasError::InvalidRaster(format!("height {} too large", rows.len())))?;
        Ok(AtlasRaster {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at day `x` of row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        Some(Rgb::new(
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ))
    }

    /// Lossless PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            &self.pixels,
            self.width,
            self.height,
            ExtendedColorType::Rgb8,
        )?;
        log::debug!(
            "[Foliage Debug] encoder: {}x{} atlas encoded to {} bytes",
            self.width,
            self.height,
            png.len()
        );
        Ok(png)
    }
}

/// Compute one timeline per mapped species over `derived`.
///
/// Rows are resolved in parallel. Symbols the registry does not know are
/// drawn with the default profile.
pub fn compute_atlas(
    registry: &SpeciesRegistry,
    mapping: &SpeciesMapping,
    derived: &DerivedSeries,
    modifiers: &LocationModifiers,
) -> Result<AtlasRaster> {
    if derived.is_empty() {
        return Err(AtlasError::NoData("derived series is empty".to_string()));
    }
    let rows = mapping
        .symbols()
        .par_iter()
        .map(|symbol| {
            resolve_timeline(registry, symbol, derived, modifiers).map(|t| t.into_colors())
        })
        .collect::<std::result::Result<Vec<Vec<Rgb>>, _>>()?;
    log::info!(
        "[Foliage Debug] encoder: computed {} species rows of {} days",
        rows.len(),
        derived.len()
    );
    AtlasRaster::from_rows(&rows)
}
