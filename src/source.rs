// ABOUTME: Content buffer normalization for heterogeneous image inputs
// ABOUTME: Turns bytes, readers, pixel arrays, and registered object types into encoded PNG buffers

use crate::error::ImgcatError;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use std::any::Any;
use std::io::{Cursor, Read};

/// The polymorphic input accepted by the pipeline. Exactly one variant
/// applies per call; the caller decides the variant at the boundary.
pub enum ImageSource {
    /// An already-encoded image.
    Bytes(Vec<u8>),
    /// A readable handle, drained eagerly to completion.
    Reader(Box<dyn Read>),
    /// A text-wrapped stream, drained via its underlying byte handle.
    Text(Box<dyn Read>),
    /// A raw pixel grid, encoded to PNG here.
    Array(PixelArray),
    /// A tensor-like object, converted by a registered converter.
    Tensor(Box<dyn Any>),
    /// An eager tensor, lowered to a pixel array by a registered converter.
    EagerTensor(Box<dyn Any>),
    /// An already-decoded image, re-encoded to PNG.
    Decoded(DynamicImage),
    /// A plottable figure, rasterized by a registered converter.
    Figure(Box<dyn Any>),
    /// Anything else. Always rejected.
    Other(Box<dyn Any>),
}

/// A rank-2 (grayscale) or rank-3 (channel-last RGB/RGBA) pixel grid.
/// Shape is `[height, width]` or `[height, width, channels]`.
pub struct PixelArray {
    shape: Vec<usize>,
    data: PixelData,
}

enum PixelData {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

impl PixelArray {
    pub fn from_u8(shape: &[usize], data: Vec<u8>) -> Self {
        Self {
            shape: shape.to_vec(),
            data: PixelData::U8(data),
        }
    }

    /// Float arrays hold values in [0, 1] for RGB/RGBA; rank-2 float
    /// arrays are cast to u8 without scaling.
    pub fn from_f32(shape: &[usize], data: Vec<f32>) -> Self {
        Self {
            shape: shape.to_vec(),
            data: PixelData::F32(data),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }
}

type PngConverter = Box<dyn Fn(&dyn Any) -> anyhow::Result<Vec<u8>>>;
type ArrayConverter = Box<dyn Fn(&dyn Any) -> anyhow::Result<PixelArray>>;

/// Registry of optional converters for object-typed sources. The core never
/// depends on tensor or plotting libraries; callers register adapters here.
/// A used variant with no registered converter is a
/// [`ImgcatError::MissingOptionalDependency`].
#[derive(Default)]
pub struct Converters {
    tensor: Option<PngConverter>,
    eager_tensor: Option<ArrayConverter>,
    figure: Option<PngConverter>,
}

impl Converters {
    pub fn register_tensor<F>(&mut self, f: F)
    where
        F: Fn(&dyn Any) -> anyhow::Result<Vec<u8>> + 'static,
    {
        self.tensor = Some(Box::new(f));
    }

    pub fn register_eager_tensor<F>(&mut self, f: F)
    where
        F: Fn(&dyn Any) -> anyhow::Result<PixelArray> + 'static,
    {
        self.eager_tensor = Some(Box::new(f));
    }

    pub fn register_figure<F>(&mut self, f: F)
    where
        F: Fn(&dyn Any) -> anyhow::Result<Vec<u8>> + 'static,
    {
        self.figure = Some(Box::new(f));
    }
}

/// Normalize a source into a single encoded-image byte buffer.
///
/// Raw bytes pass through unchanged. Readers are drained eagerly; streaming
/// is not supported. Pixel arrays and decoded images are encoded as PNG.
pub fn to_content_buf(
    source: ImageSource,
    converters: &Converters,
) -> Result<Vec<u8>, ImgcatError> {
    match source {
        ImageSource::Bytes(buf) => Ok(buf),
        ImageSource::Reader(reader) | ImageSource::Text(reader) => drain(reader),
        ImageSource::Array(array) => encode_array_png(array),
        ImageSource::Tensor(value) => match &converters.tensor {
            Some(convert) => Ok(convert(value.as_ref())?),
            None => Err(ImgcatError::MissingOptionalDependency(
                "tensor-to-PNG converter (register one to draw tensors)",
            )),
        },
        ImageSource::EagerTensor(value) => match &converters.eager_tensor {
            Some(convert) => encode_array_png(convert(value.as_ref())?),
            None => Err(ImgcatError::MissingOptionalDependency(
                "eager-tensor-to-array converter (register one to draw eager tensors)",
            )),
        },
        ImageSource::Decoded(img) => {
            let mut buf = Vec::new();
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
            Ok(buf)
        }
        ImageSource::Figure(value) => match &converters.figure {
            Some(convert) => Ok(convert(value.as_ref())?),
            None => Err(ImgcatError::MissingOptionalDependency(
                "figure rasterizer (register one to draw figures)",
            )),
        },
        ImageSource::Other(_) => Err(ImgcatError::UnsupportedType(
            "no recognized source variant matches this value",
        )),
    }
}

fn drain(mut reader: Box<dyn Read>) -> Result<Vec<u8>, ImgcatError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Encode a pixel array as PNG. Rank 2 is 8-bit grayscale; rank 3 must have
/// 3 or 4 trailing channels. Rank-3 float values are scaled by 255 before
/// the u8 cast; rank-2 floats are cast directly.
fn encode_array_png(array: PixelArray) -> Result<Vec<u8>, ImgcatError> {
    let channels: usize = match array.shape.as_slice() {
        [_, _] => 1,
        [_, _, c] if *c == 3 || *c == 4 => *c,
        _ => return Err(ImgcatError::InvalidShape(array.shape)),
    };
    let (height, width) = (array.shape[0], array.shape[1]);

    let pixels: Vec<u8> = match array.data {
        PixelData::U8(v) => v,
        PixelData::F32(v) if channels == 1 => v.into_iter().map(|x| x as u8).collect(),
        PixelData::F32(v) => v.into_iter().map(|x| (x * 255.0) as u8).collect(),
    };
    if pixels.len() != height * width * channels {
        return Err(ImgcatError::InvalidShape(array.shape));
    }

    let (w, h) = (width as u32, height as u32);
    let img: DynamicImage = match channels {
        1 => GrayImage::from_raw(w, h, pixels).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgb8),
        _ => RgbaImage::from_raw(w, h, pixels).map(DynamicImage::ImageRgba8),
    }
    .ok_or(ImgcatError::InvalidShape(array.shape))?;

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_bytes_pass_through_unchanged() {
        let data = vec![1u8, 2, 3, 4];
        let converters = Converters::default();

        let first = to_content_buf(ImageSource::Bytes(data.clone()), &converters).unwrap();
        let second = to_content_buf(ImageSource::Bytes(data.clone()), &converters).unwrap();

        assert_eq!(first, data);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reader_is_drained_to_completion() {
        let converters = Converters::default();
        let reader = Box::new(Cursor::new(b"encoded image bytes".to_vec()));

        let buf = to_content_buf(ImageSource::Reader(reader), &converters).unwrap();
        assert_eq!(buf, b"encoded image bytes");
    }

    #[test]
    fn test_text_stream_is_drained_via_byte_handle() {
        let converters = Converters::default();
        let reader = Box::new(Cursor::new(b"text-wrapped bytes".to_vec()));

        let buf = to_content_buf(ImageSource::Text(reader), &converters).unwrap();
        assert_eq!(buf, b"text-wrapped bytes");
    }

    #[test]
    fn test_grayscale_array_round_trips_dimensions() {
        let converters = Converters::default();
        let array = PixelArray::from_u8(&[4, 7], vec![128u8; 4 * 7]);

        let buf = to_content_buf(ImageSource::Array(array), &converters).unwrap();
        assert!(!buf.is_empty());

        let img = image::load_from_memory(&buf).unwrap();
        assert_eq!((img.width(), img.height()), (7, 4));
    }

    #[test]
    fn test_rgb_float_array_is_scaled_to_255() {
        let converters = Converters::default();
        let array = PixelArray::from_f32(&[1, 1, 3], vec![1.0, 0.0, 1.0]);

        let buf = to_content_buf(ImageSource::Array(array), &converters).unwrap();
        let img = image::load_from_memory(&buf).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 255]);
    }

    #[test]
    fn test_five_channel_array_is_invalid_shape() {
        let converters = Converters::default();
        let array = PixelArray::from_u8(&[2, 2, 5], vec![0u8; 20]);

        let err = to_content_buf(ImageSource::Array(array), &converters).unwrap_err();
        assert!(matches!(err, ImgcatError::InvalidShape(shape) if shape == vec![2, 2, 5]));
    }

    #[test]
    fn test_rank_one_array_is_invalid_shape() {
        let converters = Converters::default();
        let array = PixelArray::from_u8(&[12], vec![0u8; 12]);

        let err = to_content_buf(ImageSource::Array(array), &converters).unwrap_err();
        assert!(matches!(err, ImgcatError::InvalidShape(_)));
    }

    #[test]
    fn test_array_data_length_mismatch_is_invalid_shape() {
        let converters = Converters::default();
        let array = PixelArray::from_u8(&[4, 4], vec![0u8; 3]);

        let err = to_content_buf(ImageSource::Array(array), &converters).unwrap_err();
        assert!(matches!(err, ImgcatError::InvalidShape(_)));
    }

    #[test]
    fn test_decoded_image_is_reencoded_as_png() {
        let converters = Converters::default();
        let img = DynamicImage::ImageRgb8(RgbImage::new(5, 3));

        let buf = to_content_buf(ImageSource::Decoded(img), &converters).unwrap();
        assert!(buf.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_tensor_without_converter_is_missing_dependency() {
        let converters = Converters::default();
        let err =
            to_content_buf(ImageSource::Tensor(Box::new(42u32)), &converters).unwrap_err();
        assert!(matches!(err, ImgcatError::MissingOptionalDependency(_)));
    }

    #[test]
    fn test_figure_without_converter_is_missing_dependency() {
        let converters = Converters::default();
        let err =
            to_content_buf(ImageSource::Figure(Box::new(())), &converters).unwrap_err();
        assert!(matches!(err, ImgcatError::MissingOptionalDependency(_)));
    }

    #[test]
    fn test_registered_tensor_converter_is_used() {
        let mut converters = Converters::default();
        converters.register_tensor(|_| Ok(b"converted".to_vec()));

        let buf = to_content_buf(ImageSource::Tensor(Box::new(42u32)), &converters).unwrap();
        assert_eq!(buf, b"converted");
    }

    #[test]
    fn test_eager_tensor_recurses_into_array_encoding() {
        let mut converters = Converters::default();
        converters.register_eager_tensor(|value| {
            let side = *value
                .downcast_ref::<usize>()
                .ok_or_else(|| anyhow::anyhow!("expected usize"))?;
            Ok(PixelArray::from_u8(&[side, side], vec![0u8; side * side]))
        });

        let buf =
            to_content_buf(ImageSource::EagerTensor(Box::new(6usize)), &converters).unwrap();
        let img = image::load_from_memory(&buf).unwrap();
        assert_eq!((img.width(), img.height()), (6, 6));
    }

    #[test]
    fn test_unmatched_value_is_unsupported_type() {
        let converters = Converters::default();
        let err =
            to_content_buf(ImageSource::Other(Box::new("surprise")), &converters).unwrap_err();
        assert!(matches!(err, ImgcatError::UnsupportedType(_)));
    }
}
