use std::path::Path;

use anyhow::{bail, Context, Result};

/// A 2D sRGB texture plus its default view, ready to bind to the quad pass.
pub struct QuadTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl QuadTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Creates the texture and uploads `image` (top row first).
    ///
    /// Fails when the image is larger than the device allows.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &image::RgbaImage,
        label: Option<&str>,
    ) -> Result<Self> {
        let (width, height) = image.dimensions();
        check_dimensions(width, height, device.limits().max_texture_dimension_2d)?;
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        if width > 0 && height > 0 {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                image.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                size,
            );
        } else {
            log::warn!("QuadTexture {label:?}: empty image, uploading nothing");
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            texture,
            view,
            width: size.width,
            height: size.height,
        })
    }

    /// Decodes an image file and uploads it.
    pub fn from_path(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> Result<Self> {
        let image = load_rgba(path)?;
        let label = path.file_name().and_then(|n| n.to_str());
        Self::from_image(device, queue, &image, label)
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Texture size in texels.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Decodes an image file into 8-bit RGBA, top row first.
pub fn load_rgba(path: &Path) -> Result<image::RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?
        .to_rgba8();
    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Rejects images with a side longer than `max_dimension` texels.
fn check_dimensions(width: u32, height: u32, max_dimension: u32) -> Result<()> {
    if width > max_dimension || height > max_dimension {
        bail!("image is {width}x{height}, the device allows at most {max_dimension} texels per side");
    }
    Ok(())
}

/// Square black/white checkerboard with `cells` cells per side.
///
/// Used as a stand-in when no image is supplied.
pub fn checkerboard(size: u32, cells: u32) -> image::RgbaImage {
    let cell = (size / cells.max(1)).max(1);
    image::RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([24, 24, 24, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rgba_reports_missing_file() {
        let path = Path::new("definitely/not/here.png");
        let err = load_rgba(path).unwrap_err();
        assert!(format!("{err:#}").contains("here.png"), "{err:#}");
    }

    #[test]
    fn dimensions_within_limit_pass() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        assert!(check_dimensions(max, 1, max).is_ok());
        assert!(check_dimensions(0, 0, max).is_ok());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let max = wgpu::Limits::default().max_texture_dimension_2d;
        let err = check_dimensions(max + 808, 100, max).unwrap_err();
        assert!(err.to_string().contains(&max.to_string()), "{err}");
        assert!(check_dimensions(100, max + 1, max).is_err());
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let img = checkerboard(8, 4);
        assert_eq!(img.dimensions(), (8, 8));
        let a = img.get_pixel(0, 0).0;
        let b = img.get_pixel(2, 0).0;
        let c = img.get_pixel(2, 2).0;
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn checkerboard_tolerates_zero_cells() {
        let img = checkerboard(4, 0);
        assert_eq!(img.dimensions(), (4, 4));
    }
}
