// ABOUTME: Kitty terminal graphics protocol implementation
// ABOUTME: Handles base64 encoding and chunking according to the kitty spec

use super::ImageProtocol;
use crate::error::ImgcatError;
use crate::geometry::RenderGeometry;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::Write;

// Chunk payloads must stay at or below 4096 bytes (a multiple of 4).
const CHUNK_SIZE: usize = 4096;

pub struct KittyProtocol;

impl ImageProtocol for KittyProtocol {
    fn render(
        &self,
        out: &mut dyn Write,
        data: &[u8],
        geometry: &RenderGeometry,
    ) -> Result<(), ImgcatError> {
        let base64_data = STANDARD.encode(data);
        let chunks: Vec<&[u8]> = base64_data.as_bytes().chunks(CHUNK_SIZE).collect();

        for (i, chunk) in chunks.iter().enumerate() {
            let more = if i + 1 == chunks.len() { 0 } else { 1 };
            if i == 0 {
                // First chunk carries the transmission action, PNG format
                // code, and row placement.
                write!(out, "\x1b_Ga=T,f=100,r={},m={};", geometry.height_rows, more)?;
            } else {
                write!(out, "\x1b_Gm={};", more)?;
            }
            out.write_all(chunk)?;
            out.write_all(b"\x1b\\")?;
        }

        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }

    fn clear(&self, out: &mut dyn Write) -> Result<(), ImgcatError> {
        out.write_all(b"\x1b_Ga=d\x1b\\")?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(rows: u32) -> RenderGeometry {
        RenderGeometry {
            height_rows: rows,
            width_cols: None,
            filename: None,
            preserve_aspect_ratio: true,
        }
    }

    #[test]
    fn test_single_chunk_transmission() {
        let mut out = Vec::new();
        KittyProtocol
            .render(&mut out, &[0x89, 0x50, 0x4E, 0x47], &geometry(12))
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("\x1b_Ga=T,f=100,r=12,m=0;"));
        assert!(output.contains(&STANDARD.encode([0x89, 0x50, 0x4E, 0x47])));
        assert!(output.contains("\x1b\\"));
        assert!(output.ends_with('\n'));
    }

    #[test]
    fn test_large_payload_is_chunked() {
        let mut out = Vec::new();
        let data = vec![0xABu8; 8192]; // base64 expands past one chunk
        KittyProtocol.render(&mut out, &data, &geometry(5)).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("\x1b_Ga=T,f=100,r=5,m=1;"));
        assert!(output.contains("\x1b_Gm=1;"));
        assert!(output.contains("\x1b_Gm=0;"));
    }

    #[test]
    fn test_chunks_never_exceed_limit() {
        let data = vec![0x42u8; 20_000];
        let encoded = STANDARD.encode(&data);
        for chunk in encoded.as_bytes().chunks(CHUNK_SIZE) {
            assert!(chunk.len() <= CHUNK_SIZE);
        }
    }

    #[test]
    fn test_clear_deletes_all_graphics() {
        let mut out = Vec::new();
        KittyProtocol.clear(&mut out).unwrap();
        assert_eq!(out, b"\x1b_Ga=d\x1b\\");
    }
}
