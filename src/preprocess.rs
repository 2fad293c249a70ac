//! Turns uploaded image bytes into the fixed input tensor of the classifier.

use clap::ValueEnum;
use image::imageops::FilterType;
use ndarray::Array4;

use crate::error::PreprocessError;

pub const INPUT_SIZE: u32 = 224;

/// Axis order of the model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TensorLayout {
    /// `(1, 224, 224, 3)`, the Keras default.
    Nhwc,
    /// `(1, 3, 224, 224)`
    Nchw,
}

impl TensorLayout {
    pub fn shape(&self) -> [usize; 4] {
        let s = INPUT_SIZE as usize;
        match self {
            Self::Nhwc => [1, s, s, 3],
            Self::Nchw => [1, 3, s, s],
        }
    }
}

/// Decode, resize to 224x224 RGB and scale intensities to `[0, 1]`.
///
/// The aspect ratio is not preserved: the image is stretched to the square
/// input the network was trained on.
pub fn to_tensor(bytes: &[u8], layout: TensorLayout) -> Result<Array4<f32>, PreprocessError> {
    let img = image::load_from_memory(bytes)?;
    let rgb = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();

    let [n, a, b, c] = layout.shape();
    let mut tensor = Array4::<f32>::zeros((n, a, b, c));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for ch in 0..3 {
            let value = pixel[ch] as f32 / 255.0;
            match layout {
                TensorLayout::Nhwc => tensor[[0, y, x, ch]] = value,
                TensorLayout::Nchw => tensor[[0, ch, y, x]] = value,
            }
        }
    }

    Ok(tensor)
}
