// ABOUTME: Library exports and pipeline orchestration for inline terminal images
// ABOUTME: Wires normalization, header sniffing, geometry, and backend dispatch together

pub mod cli;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod protocols;
pub mod sniff;
pub mod source;

pub use error::ImgcatError;
pub use geometry::RenderGeometry;
pub use source::{Converters, ImageSource, PixelArray};

use geometry::{FALLBACK_HEIGHT_ROWS, HEIGHT_MARGIN_ROWS, PIXELS_PER_LINE};
use sniff::{FallbackDecoder, ImageCrateDecoder};
use std::io::Write;

/// Per-call display options. `term` is the terminal-identification signal,
/// passed in explicitly so the same pipeline works under any simulated
/// terminal identity.
pub struct ImgcatOptions {
    pub filename: Option<String>,
    pub width: Option<u16>,
    pub height: Option<u32>,
    pub preserve_aspect_ratio: bool,
    pub term: String,
}

impl Default for ImgcatOptions {
    fn default() -> Self {
        Self {
            filename: None,
            width: None,
            height: None,
            preserve_aspect_ratio: true,
            term: String::new(),
        }
    }
}

impl ImgcatOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The image display pipeline: source → buffer → dimensions → geometry →
/// protocol encoder. Holds the optional converter registry and fallback
/// dimension decoder; everything else is per-call state.
pub struct Imgcat {
    converters: Converters,
    decoder: Option<Box<dyn FallbackDecoder>>,
}

impl Imgcat {
    pub fn new() -> Self {
        Self {
            converters: Converters::default(),
            decoder: Some(Box::new(ImageCrateDecoder)),
        }
    }

    /// Drop the fallback dimension decoder; unrecognized formats then always
    /// degrade to unknown dimensions.
    pub fn without_fallback_decoder(mut self) -> Self {
        self.decoder = None;
        self
    }

    pub fn converters_mut(&mut self) -> &mut Converters {
        &mut self.converters
    }

    /// Display an image on the terminal through `out`.
    ///
    /// Normalization failures abort; sniffing and terminal-probe failures
    /// degrade to the fallback geometry with a logged diagnostic.
    pub fn render(
        &self,
        data: ImageSource,
        options: &ImgcatOptions,
        out: &mut dyn Write,
    ) -> Result<(), ImgcatError> {
        let buf = source::to_content_buf(data, &self.converters)?;
        if buf.is_empty() {
            return Err(ImgcatError::EmptyBuffer);
        }

        let (dimensions, terminal) = if options.height.is_some() {
            (None, None)
        } else {
            let dimensions = match sniff::get_image_shape(&buf, self.decoder.as_deref()) {
                Ok(dimensions) => dimensions,
                Err(e) => {
                    log::warn!("{}", e);
                    None
                }
            };
            (dimensions, detection::tty_size())
        };

        let height_rows = geometry::compute_height_rows(
            dimensions,
            options.height,
            PIXELS_PER_LINE,
            terminal,
            HEIGHT_MARGIN_ROWS,
            FALLBACK_HEIGHT_ROWS,
        );

        let render_geometry = RenderGeometry {
            height_rows,
            width_cols: options.width,
            filename: options.filename.clone(),
            preserve_aspect_ratio: options.preserve_aspect_ratio,
        };

        let backend = detection::select_backend(&options.term);
        protocols::protocol_for(backend).render(out, &buf, &render_geometry)
    }

    /// Clear any remaining graphics where the selected backend supports it.
    pub fn clear(&self, term: &str, out: &mut dyn Write) -> Result<(), ImgcatError> {
        protocols::protocol_for(detection::select_backend(term)).clear(out)
    }
}

impl Default for Imgcat {
    fn default() -> Self {
        Self::new()
    }
}

/// Display an image with default converters and the built-in fallback decoder.
pub fn imgcat(
    data: ImageSource,
    options: &ImgcatOptions,
    out: &mut dyn Write,
) -> Result<(), ImgcatError> {
    Imgcat::new().render(data, options, out)
}
