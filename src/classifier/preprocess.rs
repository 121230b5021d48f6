use super::{ClassifyError, ModelPreset};
use image::{RgbImage, imageops::FilterType};
use tract_onnx::prelude::{IntoTensor, Tensor, tract_ndarray};

/// Spatial resolution the model expects, in pixels per side.
pub const INPUT_SIZE: u32 = 224;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decodes encoded image bytes into a normalized batch-of-one tensor laid
/// out for `preset`.
pub fn decode_to_tensor(
    image_bytes: &[u8],
    preset: ModelPreset,
) -> Result<Tensor, ClassifyError> {
    let dyn_img = image::load_from_memory(image_bytes)?;
    let rgb = image::imageops::resize(
        &dyn_img.to_rgb8(),
        INPUT_SIZE,
        INPUT_SIZE,
        FilterType::CatmullRom,
    );
    rgb_to_tensor(&rgb, preset)
}

fn rgb_to_tensor(rgb: &RgbImage, preset: ModelPreset) -> Result<Tensor, ClassifyError> {
    let shape = preset.input_shape();
    if rgb.width() != INPUT_SIZE || rgb.height() != INPUT_SIZE {
        return Err(ClassifyError::Tensor(format!(
            "expected {}x{} pixels, got {}x{}",
            INPUT_SIZE,
            INPUT_SIZE,
            rgb.width(),
            rgb.height()
        )));
    }

    let array = match preset {
        ModelPreset::Keras => tract_ndarray::Array4::from_shape_fn(shape, |(_, y, x, c)| {
            let value = rgb.get_pixel(x as u32, y as u32)[c] as f32;
            value / 127.5 - 1.0
        }),
        ModelPreset::Torchvision => tract_ndarray::Array4::from_shape_fn(shape, |(_, c, y, x)| {
            let value = rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
            (value - IMAGENET_MEAN[c]) / IMAGENET_STD[c]
        }),
    };

    Ok(array.into_tensor())
}
