//! Offscreen capture and PNG encoding.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::error::MolvisError;
use crate::gpu::render_context::RenderContext;

/// `screenshot-{w}x{h}-{unix_seconds}.png`
#[must_use]
pub fn file_name(width: u32, height: u32, unix_seconds: u64) -> String {
    format!("screenshot-{width}x{height}-{unix_seconds}.png")
}

/// Row pitch of a texture-to-buffer copy: 4 bytes per pixel, padded to
/// `COPY_BYTES_PER_ROW_ALIGNMENT`.
#[must_use]
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Drop the row padding of a readback and swap B and R when the texture
/// was BGRA.
#[must_use]
pub fn to_rgba(
    data: &[u8],
    width: u32,
    height: u32,
    padded_row: u32,
    bgra: bool,
) -> Vec<u8> {
    let row = (width * 4) as usize;
    let mut out = Vec::with_capacity(row * height as usize);
    for chunk in data.chunks(padded_row as usize).take(height as usize) {
        out.extend_from_slice(&chunk[..row.min(chunk.len())]);
    }
    if bgra {
        for pixel in out.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
    out
}

fn is_bgra(format: wgpu::TextureFormat) -> bool {
    matches!(
        format,
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
    )
}

/// Encode `rgba` as PNG at `path`.
///
/// # Errors
///
/// Fails on a size mismatch or when the file cannot be written.
pub fn save_png(
    path: &Path,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
) -> Result<(), MolvisError> {
    let image = image::RgbaImage::from_raw(width, height, rgba).ok_or_else(
        || MolvisError::Screenshot("pixel buffer size mismatch".to_owned()),
    )?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| MolvisError::Screenshot(e.to_string()))
}

/// Offscreen color target for one capture.
pub struct CaptureTarget {
    texture: wgpu::Texture,
    /// View to render into.
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl CaptureTarget {
    /// Target matching the context's size and format.
    #[must_use]
    pub fn new(context: &RenderContext) -> Self {
        let (width, height) = context.size();
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Screenshot Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: context.format(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Copy the rendered target back and write it as PNG into `dir`.
    ///
    /// # Errors
    ///
    /// Fails when the readback or encoding fails.
    pub fn save(
        &self,
        context: &RenderContext,
        dir: &Path,
        unix_seconds: u64,
    ) -> Result<PathBuf, MolvisError> {
        let padded_row = padded_bytes_per_row(self.width);
        let buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screenshot Readback"),
            size: u64::from(padded_row) * u64::from(self.height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = context.create_encoder();
        encoder.copy_texture_to_buffer(
            self.texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        context.submit(encoder);

        let slice = buffer.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = context
            .device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| MolvisError::Screenshot(e.to_string()))?;
        rx.recv()
            .map_err(|e| MolvisError::Screenshot(e.to_string()))?
            .map_err(|e| MolvisError::Screenshot(e.to_string()))?;

        let rgba = to_rgba(
            &slice.get_mapped_range(),
            self.width,
            self.height,
            padded_row,
            is_bgra(self.texture.format()),
        );
        buffer.unmap();

        let path = dir.join(file_name(self.width, self.height, unix_seconds));
        save_png(&path, self.width, self.height, rgba)?;
        log::info!("saved screenshot {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_carries_size_and_time() {
        assert_eq!(
            file_name(800, 600, 1_700_000_000),
            "screenshot-800x600-1700000000.png"
        );
    }

    #[test]
    fn rows_are_padded_to_256_bytes() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(1), 256);
    }

    #[test]
    fn padding_is_dropped_and_bgra_swapped() {
        let padded = padded_bytes_per_row(2) as usize;
        let mut data = vec![0_u8; padded * 2];
        data[..8].copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        data[padded..padded + 8]
            .copy_from_slice(&[9, 10, 11, 12, 13, 14, 15, 16]);
        let rgba = to_rgba(&data, 2, 2, padded as u32, true);
        assert_eq!(
            rgba,
            vec![3, 2, 1, 4, 7, 6, 5, 8, 11, 10, 9, 12, 15, 14, 13, 16]
        );
    }

    #[test]
    fn png_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name(2, 1, 5));
        save_png(&path, 2, 1, vec![255; 8]).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert!(save_png(&path, 3, 3, vec![0; 4]).is_err());
    }
}
