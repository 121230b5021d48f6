// Inference adapter around a pretrained ImageNet classifier.
// Turns raw upload bytes into a ranked list of predictions.

mod labels;
mod onnx;
mod preprocess;

pub use labels::ClassLabels;
pub use onnx::OnnxClassifier;
pub use preprocess::{INPUT_SIZE, decode_to_tensor};

use clap::ValueEnum;
use std::sync::Arc;

/// Number of predictions reported for each image.
pub const TOP_K: usize = 5;

/// Label fragments that mark a prediction as a cat.
pub const CAT_BREEDS: [&str; 5] = [
    "tabby",
    "tiger_cat",
    "persian_cat",
    "siamese_cat",
    "egyptian_cat",
];

pub type SharedClassifier = Arc<dyn Classifier>;

/// A single ranked class from the model output.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// WordNet id from the class index. Logged, not sent to clients.
    pub class_id: String,
    pub class_name: String,
    pub probability: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to build input tensor: {0}")]
    Tensor(String),
    #[error("model inference failed: {0:?}")]
    Inference(tract_onnx::prelude::TractError),
    #[error("model produced {actual} scores but {expected} class labels are loaded")]
    OutputShape { expected: usize, actual: usize },
}

/// Classifies encoded image bytes.
///
/// Implementations are loaded once at startup and shared read-only between
/// requests, so they must be `Send + Sync`.
pub trait Classifier: Send + Sync {
    fn classify(&self, image_bytes: &[u8]) -> Result<Vec<Prediction>, ClassifyError>;
}

/// Preprocessing and output conventions of the exported model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelPreset {
    /// Keras MobileNetV2: NHWC input scaled to [-1, 1], softmax output.
    Keras,
    /// torchvision export: NCHW input with ImageNet mean/std, logit output.
    Torchvision,
}

impl ModelPreset {
    pub fn input_shape(self) -> [usize; 4] {
        let size = INPUT_SIZE as usize;
        match self {
            ModelPreset::Keras => [1, size, size, 3],
            ModelPreset::Torchvision => [1, 3, size, size],
        }
    }

    pub fn outputs_logits(self) -> bool {
        matches!(self, ModelPreset::Torchvision)
    }
}

/// True if any predicted class name contains a known cat breed.
pub fn contains_cat(predictions: &[Prediction]) -> bool {
    predictions.iter().any(|pred| {
        let name = pred.class_name.to_lowercase();
        CAT_BREEDS.iter().any(|breed| name.contains(breed))
    })
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Picks the `k` highest scores and attaches their labels, best first.
/// Ties keep the lower class index first.
pub fn top_k(
    probabilities: &[f32],
    labels: &ClassLabels,
    k: usize,
) -> Result<Vec<Prediction>, ClassifyError> {
    if probabilities.len() != labels.len() {
        return Err(ClassifyError::OutputShape {
            expected: labels.len(),
            actual: probabilities.len(),
        });
    }

    let mut ranked: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    ranked.sort_by(|(ia, a), (ib, b)| b.total_cmp(a).then(ia.cmp(ib)));

    Ok(ranked
        .into_iter()
        .take(k)
        .filter_map(|(index, probability)| {
            labels.get(index).map(|label| Prediction {
                class_id: label.id.clone(),
                class_name: label.name.clone(),
                probability,
            })
        })
        .collect())
}
