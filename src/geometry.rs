// ABOUTME: Display geometry calculation mapping pixel height to terminal rows
// ABOUTME: Clamps automatic heights to the terminal and falls back when dimensions are unknown

/// Vertical pixels represented by one terminal row.
pub const PIXELS_PER_LINE: u32 = 24;

/// Rows kept free below the image so the prompt does not erase it.
pub const HEIGHT_MARGIN_ROWS: u16 = 9;

/// Rows used when the image height could not be determined.
pub const FALLBACK_HEIGHT_ROWS: u32 = 10;

/// The resolved geometry handed to a rendering protocol.
#[derive(Debug, Clone)]
pub struct RenderGeometry {
    pub height_rows: u32,
    pub width_cols: Option<u16>,
    pub filename: Option<String>,
    pub preserve_aspect_ratio: bool,
}

/// Compute the number of terminal rows the image should occupy.
///
/// An explicit height wins verbatim, with no clamping. Otherwise known pixel
/// dimensions are divided by `pixels_per_line` (rounding up) and clamped to
/// the terminal when its size is known. Unknown dimensions fall back to
/// `fallback_rows`, unclamped.
pub fn compute_height_rows(
    dimensions: Option<(u32, u32)>,
    explicit_height: Option<u32>,
    pixels_per_line: u32,
    terminal: Option<(u16, u16)>,
    margin: u16,
    fallback_rows: u32,
) -> u32 {
    debug_assert!(pixels_per_line > 0);

    if let Some(height) = explicit_height {
        return height;
    }

    match dimensions {
        Some((_, pixel_height)) => {
            let mut rows = pixel_height.div_ceil(pixels_per_line);
            if let Some((terminal_rows, _)) = terminal {
                // Limit to the current tty, otherwise the image gets erased.
                rows = rows.min(u32::from(terminal_rows.saturating_sub(margin))).max(1);
            }
            rows
        }
        None => fallback_rows,
    }
}
