// Request and response shapes for the upload API

use crate::classifier::{Prediction, contains_cat};
use serde::{Deserialize, Serialize};

/// An uploaded file, held only while its request is handled.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionEntry {
    /// Human-readable class name.
    pub class: String,
    pub probability: f64,
}

/// Success body of `POST /upload`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClassificationResponse {
    pub is_cat: bool,
    pub predictions: Vec<PredictionEntry>,
}

impl From<Vec<Prediction>> for ClassificationResponse {
    fn from(predictions: Vec<Prediction>) -> Self {
        Self {
            is_cat: contains_cat(&predictions),
            predictions: predictions
                .into_iter()
                .map(|pred| PredictionEntry {
                    class: pred.class_name,
                    probability: f64::from(pred.probability),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_json_shape() {
        let response = ClassificationResponse::from(vec![
            Prediction {
                class_id: "n02123045".to_string(),
                class_name: "tabby".to_string(),
                probability: 0.5,
            },
            Prediction {
                class_id: "n02124075".to_string(),
                class_name: "Egyptian_cat".to_string(),
                probability: 0.25,
            },
        ]);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "is_cat": true,
                "predictions": [
                    { "class": "tabby", "probability": 0.5 },
                    { "class": "Egyptian_cat", "probability": 0.25 },
                ]
            })
        );
    }

    #[test]
    fn test_response_not_cat() {
        let response = ClassificationResponse::from(vec![Prediction {
            class_id: "n02099601".to_string(),
            class_name: "golden_retriever".to_string(),
            probability: 0.9,
        }]);
        assert!(!response.is_cat);
        assert_eq!(response.predictions[0].class, "golden_retriever");
    }
}
