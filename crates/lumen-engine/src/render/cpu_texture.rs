use super::sampler::{FilterMode, SamplerState};

/// Reasons a [`CpuTexture`] cannot be built.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureError {
    ZeroSize { width: u32, height: u32 },
    TexelCountMismatch { expected: usize, got: usize },
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::ZeroSize { width, height } => {
                write!(f, "texture has zero area ({width}x{height})")
            }
            TextureError::TexelCountMismatch { expected, got } => {
                write!(f, "expected {expected} texels, got {got}")
            }
        }
    }
}

impl std::error::Error for TextureError {}

/// RGBA texture held in host memory, sampled the way the GPU samples.
///
/// Texels are row-major with the top row first, which is also the order
/// `QuadTexture` uploads them, so texture coordinate `(0, 0)` is the
/// top-left texel on both sides. Values are the stored unorm values; no
/// sRGB decode is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTexture {
    width: u32,
    height: u32,
    texels: Vec<[f32; 4]>,
}

impl CpuTexture {
    pub fn new(width: u32, height: u32, texels: Vec<[f32; 4]>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSize { width, height });
        }
        let expected = width as usize * height as usize;
        if texels.len() != expected {
            return Err(TextureError::TexelCountMismatch {
                expected,
                got: texels.len(),
            });
        }
        Ok(Self { width, height, texels })
    }

    /// Converts 8-bit RGBA to normalized floats.
    pub fn from_rgba8(image: &image::RgbaImage) -> Result<Self, TextureError> {
        let texels = image
            .pixels()
            .map(|p| p.0.map(|c| f32::from(c) / 255.0))
            .collect();
        Self::new(image.width(), image.height(), texels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at integer coordinates, or `None` outside the texture.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.texel(x, y))
    }

    /// Texel at integer coordinates. Both must be in range.
    #[inline]
    pub(crate) fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        self.texels[y as usize * self.width as usize + x as usize]
    }

    /// Samples at normalized coordinates.
    ///
    /// Texel centers sit at `(i + 0.5) / size`. There are no derivatives to
    /// choose between minification and magnification, so `mag_filter` is
    /// always used. Any `uv` is accepted; coordinates too large for an index
    /// pin to the far end and non-finite ones carry no blend weight.
    pub fn sample(&self, sampler: &SamplerState, uv: [f32; 2]) -> [f32; 4] {
        let u = |i: i64| sampler.address_mode_u.resolve(i, self.width);
        let v = |i: i64| sampler.address_mode_v.resolve(i, self.height);

        match sampler.mag_filter {
            FilterMode::Nearest => {
                let (x, _) = split(uv[0] * self.width as f32);
                let (y, _) = split(uv[1] * self.height as f32);
                self.texel(u(x), v(y))
            }
            FilterMode::Linear => {
                let (x0, tx) = split(uv[0] * self.width as f32 - 0.5);
                let (y0, ty) = split(uv[1] * self.height as f32 - 0.5);
                let (x1, y1) = (x0.saturating_add(1), y0.saturating_add(1));

                let top = lerp(self.texel(u(x0), v(y0)), self.texel(u(x1), v(y0)), tx);
                let bottom = lerp(self.texel(u(x0), v(y1)), self.texel(u(x1), v(y1)), tx);
                lerp(top, bottom, ty)
            }
        }
    }
}

/// Splits a texel-space coordinate into its integer index and fraction.
///
/// The float-to-int cast saturates, and NaN maps to index 0.
#[inline]
fn split(f: f32) -> (i64, f32) {
    let floor = f.floor();
    let frac = f - floor;
    (floor as i64, if frac.is_finite() { frac } else { 0.0 })
}

#[inline]
fn lerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    std::array::from_fn(|i| a[i] * (1.0 - t) + b[i] * t)
}
