// ABOUTME: iTerm2 inline image protocol implementation
// ABOUTME: Emits OSC 1337 File sequences with size and display geometry parameters

use super::ImageProtocol;
use crate::error::ImgcatError;
use crate::geometry::RenderGeometry;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::Write;

pub struct Iterm2Protocol;

impl ImageProtocol for Iterm2Protocol {
    fn render(
        &self,
        out: &mut dyn Write,
        data: &[u8],
        geometry: &RenderGeometry,
    ) -> Result<(), ImgcatError> {
        let mut args = Vec::new();
        if let Some(filename) = &geometry.filename {
            args.push(format!("name={}", STANDARD.encode(filename.as_bytes())));
        }
        args.push(format!("size={}", data.len()));
        args.push("inline=1".to_string());
        if let Some(width) = geometry.width_cols {
            args.push(format!("width={}", width));
        }
        args.push(format!("height={}", geometry.height_rows));
        args.push(format!(
            "preserveAspectRatio={}",
            if geometry.preserve_aspect_ratio { 1 } else { 0 }
        ));

        write!(
            out,
            "\x1b]1337;File={}:{}\x07\n",
            args.join(";"),
            STANDARD.encode(data)
        )?;
        out.flush()?;
        Ok(())
    }

    // iTerm2 has no graphics-clearing sequence.
    fn clear(&self, _out: &mut dyn Write) -> Result<(), ImgcatError> {
        Ok(())
    }
}
