//! Raster snapshots for history, image decoding and PNG encoding.

use crate::pixmap::PixmapSurface;
use crate::surface::{RenderError, RenderResult};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future, as returned by [`SnapshotDecoder`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Encoded raster state kept by a history checkpoint.
///
/// Holds the exact premultiplied bytes, so restoring is lossless. Cloning
/// shares the buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterSnapshot {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl std::fmt::Debug for RasterSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSnapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl RasterSnapshot {
    pub fn new(width: u32, height: u32, data: Arc<[u8]>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Turns stored snapshots and image files back into pixels.
///
/// Decoding is asynchronous so hosts can hand the work to a platform decoder;
/// callers must not touch their raster until the future resolves.
pub trait SnapshotDecoder {
    fn decode_snapshot<'a>(&'a self, snapshot: &'a RasterSnapshot) -> BoxFuture<'a, RenderResult<PixmapSurface>>;

    /// Decode an encoded image (PNG, JPEG or WebP) to a surface of its own size.
    fn decode_image<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, RenderResult<PixmapSurface>>;
}

/// Decodes on the calling thread; the futures are ready immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuDecoder;

impl SnapshotDecoder for CpuDecoder {
    fn decode_snapshot<'a>(&'a self, snapshot: &'a RasterSnapshot) -> BoxFuture<'a, RenderResult<PixmapSurface>> {
        Box::pin(std::future::ready(PixmapSurface::from_premultiplied(
            snapshot.width,
            snapshot.height,
            snapshot.data.to_vec(),
        )))
    }

    fn decode_image<'a>(&'a self, bytes: &'a [u8]) -> BoxFuture<'a, RenderResult<PixmapSurface>> {
        Box::pin(std::future::ready(decode_image(bytes)))
    }
}

/// Decode PNG, JPEG or WebP bytes.
pub fn decode_image(bytes: &[u8]) -> RenderResult<PixmapSurface> {
    let img = image::load_from_memory(bytes).map_err(|e| RenderError::Decode(e.to_string()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixmapSurface::from_rgba(width, height, rgba.as_raw())
}

/// Encode straight RGBA8 pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;
    use peniko::Color;

    #[test]
    fn test_snapshot_roundtrip_is_lossless() {
        let mut surface = PixmapSurface::new(6, 6).unwrap();
        surface.fill_circle(kurbo::Point::new(3.0, 3.0), 2.5, Color::from_rgba8(10, 200, 30, 90), Default::default());
        let snapshot = surface.snapshot();
        let restored = pollster::block_on(CpuDecoder.decode_snapshot(&snapshot)).unwrap();
        assert_eq!(restored.data(), surface.data());
    }

    #[test]
    fn test_png_roundtrip_opaque() {
        let mut surface = PixmapSurface::new(5, 3).unwrap();
        surface.clear(Some(Color::from_rgba8(12, 34, 56, 255)));
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded.width(), 5);
        assert_eq!(decoded.height(), 3);
        assert_eq!(decoded.to_rgba(), surface.to_rgba());
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = pollster::block_on(CpuDecoder.decode_image(b"not an image"));
        assert!(matches!(result, Err(RenderError::Decode(_))));
    }
}
