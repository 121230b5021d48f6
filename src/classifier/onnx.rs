use super::{
    ClassLabels, Classifier, ClassifyError, ModelPreset, Prediction, TOP_K, decode_to_tensor,
    softmax, top_k,
};
use std::path::Path;
use tract_onnx::prelude::*;

/// Pretrained classifier executed with tract's CPU runtime.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    labels: ClassLabels,
    preset: ModelPreset,
}

impl OnnxClassifier {
    /// Loads and optimizes the ONNX model with its input pinned to the
    /// preset's batch-of-one shape.
    pub fn load(
        model_path: impl AsRef<Path>,
        labels: ClassLabels,
        preset: ModelPreset,
    ) -> TractResult<Self> {
        let model_path = model_path.as_ref();
        tracing::debug!("Loading ONNX model from {}", model_path.display());

        let plan = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    preset.input_shape().iter().copied().collect::<TVec<usize>>(),
                ),
            )?
            .into_optimized()?
            .into_runnable()?;

        tracing::info!(
            "Model {} ready: preset={:?}, {} class labels",
            model_path.display(),
            preset,
            labels.len()
        );

        Ok(Self {
            plan,
            labels,
            preset,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, image_bytes: &[u8]) -> Result<Vec<Prediction>, ClassifyError> {
        let input = decode_to_tensor(image_bytes, self.preset)?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(ClassifyError::Inference)?;
        let output = outputs.first().ok_or_else(|| ClassifyError::OutputShape {
            expected: self.labels.len(),
            actual: 0,
        })?;
        let scores: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(ClassifyError::Inference)?
            .iter()
            .copied()
            .collect();

        let probabilities = if self.preset.outputs_logits() {
            softmax(&scores)
        } else {
            scores
        };

        top_k(&probabilities, &self.labels, TOP_K)
    }
}
