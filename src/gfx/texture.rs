use anyhow::{anyhow, Context, Result};
use glow::HasContext;
use log::{error, info};
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
    ClampToEdge,
}

impl Wrap {
    fn gl_enum(self) -> i32 {
        (match self {
            Wrap::Repeat => glow::REPEAT,
            Wrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        }) as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
    LinearMipmapLinear,
}

impl Filter {
    fn gl_enum(self) -> i32 {
        (match self {
            Filter::Nearest => glow::NEAREST,
            Filter::Linear => glow::LINEAR,
            Filter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
        }) as i32
    }
}

/// Sampling state plus load options for a 2D texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    pub wrap: Wrap,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    /// Put the first image row at the bottom, matching GL texture space.
    pub flip_vertically: bool,
}

impl Default for TextureParams {
    fn default() -> Self {
        Self {
            wrap: Wrap::Repeat,
            min_filter: Filter::LinearMipmapLinear,
            mag_filter: Filter::Linear,
            flip_vertically: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    fn gl_enum(self) -> u32 {
        match self {
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }
}

/// Row-major 8-bit pixels, first row first.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

/// Decodes an image file. Three-channel images stay RGB, everything else is
/// expanded to RGBA.
pub fn decode(path: impl AsRef<Path>, flip_vertically: bool) -> Result<DecodedImage> {
    let path = path.as_ref();
    let mut img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    if flip_vertically {
        img = img.flipv();
    }

    let (width, height) = (img.width(), img.height());
    let (format, pixels) = if img.color().channel_count() == 3 {
        (PixelFormat::Rgb, img.into_rgb8().into_raw())
    } else {
        (PixelFormat::Rgba, img.into_rgba8().into_raw())
    };

    Ok(DecodedImage {
        width,
        height,
        format,
        pixels,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureStatus {
    Loaded { width: u32, height: u32 },
    Failed(String),
}

/// A 2D texture object, deleted when dropped.
pub struct Texture {
    gl: Rc<glow::Context>,
    raw: glow::Texture,
    status: TextureStatus,
}

impl Texture {
    /// Creates a texture and fills it from `path`.
    ///
    /// A decode failure is logged and leaves the texture without storage;
    /// only failing to create the texture object is an error.
    pub fn load(gl: &Rc<glow::Context>, path: impl AsRef<Path>, params: TextureParams) -> Result<Self> {
        let path = path.as_ref();
        let raw = unsafe {
            gl.create_texture()
                .map_err(|e| anyhow!("Failed to create texture: {}", e))?
        };
        let mut texture = Texture {
            gl: Rc::clone(gl),
            raw,
            status: TextureStatus::Failed(String::new()),
        };

        texture.apply_params(&params);

        texture.status = match decode(path, params.flip_vertically) {
            Ok(image) => {
                texture.upload(&image);
                info!("Loaded texture {} ({}x{})", path.display(), image.width, image.height);
                TextureStatus::Loaded {
                    width: image.width,
                    height: image.height,
                }
            }
            Err(e) => {
                error!("Failed to load texture \"{}\": {:#}", path.display(), e);
                TextureStatus::Failed(format!("{:#}", e))
            }
        };

        Ok(texture)
    }

    fn apply_params(&self, params: &TextureParams) {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.raw));
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, params.wrap.gl_enum());
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, params.wrap.gl_enum());
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                params.min_filter.gl_enum(),
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                params.mag_filter.gl_enum(),
            );
        }
    }

    fn upload(&self, image: &DecodedImage) {
        let format = image.format.gl_enum();
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.raw));
            // RGB rows are not 4-byte aligned for odd widths
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format as i32,
                image.width as i32,
                image.height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                Some(image.pixels.as_slice()),
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
        }
    }

    /// Makes `unit` the active texture unit and binds this texture to it.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.raw));
        }
    }

    pub fn status(&self) -> &TextureStatus {
        &self.status
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, LumaA, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn rgb_png_stays_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        RgbImage::from_pixel(3, 2, Rgb([10, 20, 30])).save(&path).unwrap();

        let decoded = decode(&path, false).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.format, PixelFormat::Rgb);
        assert_eq!(decoded.pixels.len(), 3 * 2 * 3);
        assert_eq!(&decoded.pixels[..3], &[10, 20, 30]);
    }

    #[test]
    fn flip_puts_first_row_last() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.png");
        let img = RgbaImage::from_fn(1, 2, |_, y| {
            if y == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        img.save(&path).unwrap();

        let upright = decode(&path, false).unwrap();
        let flipped = decode(&path, true).unwrap();
        assert_eq!(upright.format, PixelFormat::Rgba);
        assert_eq!(&upright.pixels[..4], &[255, 0, 0, 255]);
        assert_eq!(&flipped.pixels[..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn two_channel_images_expand_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayAlphaImage::from_pixel(1, 1, LumaA([100, 200])).save(&path).unwrap();

        let decoded = decode(&path, false).unwrap();
        assert_eq!(decoded.format, PixelFormat::Rgba);
        assert_eq!(decoded.pixels, vec![100, 100, 100, 200]);
    }

    #[test]
    fn jpeg_decodes_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.jpg");
        RgbImage::from_pixel(16, 8, Rgb([200, 120, 40])).save(&path).unwrap();

        let decoded = decode(&path, true).unwrap();
        assert_eq!((decoded.width, decoded.height), (16, 8));
        assert_eq!(decoded.format, PixelFormat::Rgb);
        assert_eq!(decoded.pixels.len(), 16 * 8 * 3);
        // lossy, but a flat colour survives within a few levels
        for (got, want) in decoded.pixels[..3].iter().zip([200u8, 120, 40]) {
            assert!(got.abs_diff(want) <= 8, "{} vs {}", got, want);
        }
    }

    #[test]
    fn missing_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode(dir.path().join("container.jpg"), false).unwrap_err();
        assert!(format!("{:#}", err).contains("container.jpg"));
    }
}
