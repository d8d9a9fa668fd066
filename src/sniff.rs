// ABOUTME: Binary image-header sniffing for pixel dimensions without full decoding
// ABOUTME: Tries GIF and PNG signatures in order, then an optional fallback decoder

use crate::error::ImgcatError;
use anyhow::{anyhow, Result};
use std::io::Cursor;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// A general-purpose decoder consulted when no known signature matches.
/// Its absence is tolerated; dimensions degrade to unknown.
pub trait FallbackDecoder {
    fn decode_dimensions(&self, buf: &[u8]) -> Result<(u32, u32)>;
}

/// Fallback decoder backed by the `image` crate's header-only reader.
pub struct ImageCrateDecoder;

impl FallbackDecoder for ImageCrateDecoder {
    fn decode_dimensions(&self, buf: &[u8]) -> Result<(u32, u32)> {
        let reader = image::ImageReader::new(Cursor::new(buf))
            .with_guessed_format()
            .map_err(|e| anyhow!("failed to probe image format: {}", e))?;
        reader
            .into_dimensions()
            .map_err(|e| anyhow!("failed to read image dimensions: {}", e))
    }
}

type Probe = fn(&[u8]) -> Option<Result<(u32, u32), ImgcatError>>;

// Tried in order; the first probe whose signature matches decides the result.
const PROBES: [Probe; 3] = [sniff_gif, sniff_png, sniff_png_legacy];

/// Extract the pixel (width, height) from an encoded image buffer.
///
/// Returns `Ok(None)` for unrecognized formats, with a diagnostic on the log
/// side channel. Fails with [`ImgcatError::MalformedHeader`] only when a
/// known signature is present but the header fields are truncated.
pub fn get_image_shape(
    buf: &[u8],
    fallback: Option<&dyn FallbackDecoder>,
) -> Result<Option<(u32, u32)>, ImgcatError> {
    for probe in PROBES {
        if let Some(result) = probe(buf) {
            return result.map(Some);
        }
    }

    match fallback {
        Some(decoder) => match decoder.decode_dimensions(buf) {
            Ok(dimensions) => Ok(Some(dimensions)),
            Err(e) => {
                log::warn!("cannot identify image ({}); this may not be an image file", e);
                Ok(None)
            }
        },
        None => {
            log::warn!("cannot determine the image size; no fallback image decoder is available");
            Ok(None)
        }
    }
}

// GIF: width and height are little-endian u16 at offsets 6 and 8.
fn sniff_gif(buf: &[u8]) -> Option<Result<(u32, u32), ImgcatError>> {
    if !(buf.starts_with(b"GIF87a") || buf.starts_with(b"GIF89a")) {
        return None;
    }
    if buf.len() < 10 {
        return Some(Err(ImgcatError::MalformedHeader { format: "GIF" }));
    }
    let width = u16::from_le_bytes([buf[6], buf[7]]) as u32;
    let height = u16::from_le_bytes([buf[8], buf[9]]) as u32;
    Some(Ok((width, height)))
}

// Standard PNG: IHDR chunk type at offset 12, big-endian u32 fields at 16 and 20.
fn sniff_png(buf: &[u8]) -> Option<Result<(u32, u32), ImgcatError>> {
    if !buf.starts_with(&PNG_SIGNATURE) {
        return None;
    }
    if buf.len() >= 24 && &buf[12..16] == b"IHDR" {
        return Some(Ok((read_be32(&buf[16..20]), read_be32(&buf[20..24]))));
    }
    None
}

// Legacy PNG heuristic: reads width and height from offsets 8 and 12 without
// checking the chunk type. Misparses PNGs whose first chunk is not IHDR; kept
// for compatibility with the historical behavior of this tool.
fn sniff_png_legacy(buf: &[u8]) -> Option<Result<(u32, u32), ImgcatError>> {
    if !buf.starts_with(&PNG_SIGNATURE) {
        return None;
    }
    if buf.len() < 16 {
        return Some(Err(ImgcatError::MalformedHeader { format: "PNG" }));
    }
    Some(Ok((read_be32(&buf[8..12]), read_be32(&buf[12..16]))))
}

fn read_be32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
