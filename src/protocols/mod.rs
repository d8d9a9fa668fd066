// ABOUTME: Rendering protocol implementations for terminal inline image display
// ABOUTME: Defines the encoder seam shared by the kitty and iTerm2 backends

use crate::detection::Backend;
use crate::error::ImgcatError;
use crate::geometry::RenderGeometry;
use std::io::Write;

pub trait ImageProtocol {
    /// Write the image as a protocol escape sequence to the output sink.
    fn render(
        &self,
        out: &mut dyn Write,
        data: &[u8],
        geometry: &RenderGeometry,
    ) -> Result<(), ImgcatError>;

    /// Clear previously drawn graphics. A no-op where the protocol has no
    /// such capability.
    fn clear(&self, out: &mut dyn Write) -> Result<(), ImgcatError>;
}

pub mod iterm2;
pub mod kitty;

pub use iterm2::Iterm2Protocol;
pub use kitty::KittyProtocol;

pub fn protocol_for(backend: Backend) -> Box<dyn ImageProtocol> {
    match backend {
        Backend::Kitty => Box::new(KittyProtocol),
        Backend::Iterm2 => Box::new(Iterm2Protocol),
    }
}
