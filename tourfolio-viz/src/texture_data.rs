//! Decoding of fetched texture bytes into GPU-ready pixel data
//!
//! Radiance HDR panoramas keep their dynamic range as RGBA half floats; every
//! other format is expanded to 8-bit sRGB RGBA.

use half::f16;

use crate::error::ViewerError;

#[derive(Debug, Clone, PartialEq)]
pub enum TexturePixels {
    /// RGBA half floats, stored as raw bits
    Hdr(Vec<u16>),
    /// RGBA 8-bit, sRGB encoded
    Ldr(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: TexturePixels,
}

impl DecodedTexture {
    pub fn is_hdr(&self) -> bool {
        matches!(self.pixels, TexturePixels::Hdr(_))
    }

    /// Bytes per row of the pixel data
    pub fn bytes_per_row(&self) -> u32 {
        match self.pixels {
            TexturePixels::Hdr(_) => self.width * 8,
            TexturePixels::Ldr(_) => self.width * 4,
        }
    }
}

/// Decode `bytes` fetched from `url`. The format is detected from the data.
pub fn decode(url: &str, bytes: &[u8]) -> Result<DecodedTexture, ViewerError> {
    let img = image::load_from_memory(bytes).map_err(|source| ViewerError::Decode {
        url: url.to_string(),
        source,
    })?;

    let (width, height) = (img.width(), img.height());
    let hdr = matches!(
        img,
        image::DynamicImage::ImageRgb32F(_) | image::DynamicImage::ImageRgba32F(_)
    );
    let pixels = if hdr {
        TexturePixels::Hdr(
            img.to_rgba32f()
                .into_raw()
                .into_iter()
                .map(|v| f16::from_f32(v).to_bits())
                .collect(),
        )
    } else {
        TexturePixels::Ldr(img.to_rgba8().into_raw())
    };

    tracing::debug!(url, width, height, "texture decoded");
    Ok(DecodedTexture {
        width,
        height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 255, 0, 255])
            }
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn hdr_bytes() -> Vec<u8> {
        let pixels = vec![image::Rgb([2.0f32, 1.0, 0.5]); 4];
        let mut bytes = Vec::new();
        image::codecs::hdr::HdrEncoder::new(&mut bytes)
            .encode(&pixels, 2, 2)
            .unwrap();
        bytes
    }

    #[test]
    fn png_decodes_to_ldr_rgba() {
        let texture = decode("/img/tile.png", &png_bytes()).unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert!(!texture.is_hdr());
        assert_eq!(texture.bytes_per_row(), 8);
        match texture.pixels {
            TexturePixels::Ldr(data) => {
                assert_eq!(data.len(), 16);
                assert_eq!(&data[..4], &[255, 0, 0, 255]);
            }
            TexturePixels::Hdr(_) => panic!("expected 8-bit pixels"),
        }
    }

    #[test]
    fn radiance_hdr_keeps_float_range() {
        let texture = decode("/textures/gym/entrance.hdr", &hdr_bytes()).unwrap();
        assert!(texture.is_hdr());
        assert_eq!(texture.bytes_per_row(), 16);
        match texture.pixels {
            TexturePixels::Hdr(data) => {
                assert_eq!(data.len(), 16);
                let red = f16::from_bits(data[0]).to_f32();
                let alpha = f16::from_bits(data[3]).to_f32();
                assert!(red > 1.0, "HDR values above 1 must survive, got {red}");
                assert_eq!(alpha, 1.0);
            }
            TexturePixels::Ldr(_) => panic!("expected half-float pixels"),
        }
    }

    #[test]
    fn garbage_reports_url() {
        let err = decode("/textures/broken.hdr", b"not an image").unwrap_err();
        assert!(err.to_string().contains("/textures/broken.hdr"));
    }
}
