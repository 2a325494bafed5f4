use serde::{Deserialize, Serialize};

use crate::domain::Gender;

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub gender: Gender,
    pub waist: f64,
    pub height: f64,
    pub weight: f64,
    pub age: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub risk_level: String,
    pub advice: String,
    pub detailed_advice: String,
    pub cutoff_note: String,
    #[serde(default)]
    pub recommendation: Vec<String>,
}

/// Reply of `POST /predict`. Only `success` is guaranteed; the rest depends on
/// the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trunk_fat_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Interpretation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResponse {
    pub fn succeeded(trunk_fat_percentage: f64, interpretation: Interpretation) -> Self {
        Self {
            success: true,
            trunk_fat_percentage: Some(trunk_fat_percentage),
            interpretation: Some(interpretation),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            trunk_fat_percentage: None,
            interpretation: None,
            error: Some(error.into()),
        }
    }
}

/// Reply of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    #[serde(default)]
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_flat_wire_fields() {
        let request = PredictionRequest {
            gender: Gender::Male,
            waist: 90.0,
            height: 175.0,
            weight: 80.0,
            age: 30,
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "gender": "male",
                "waist": 90.0,
                "height": 175.0,
                "weight": 80.0,
                "age": 30
            })
        );
    }

    #[test]
    fn failure_reply_without_payload_decodes() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"error":"model unavailable"}"#).expect("decode");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("model unavailable"));
        assert!(response.interpretation.is_none());
    }

    #[test]
    fn success_reply_keeps_recommendation_order() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{
                "success": true,
                "trunk_fat_percentage": 31.2,
                "interpretation": {
                    "risk_level": "较高",
                    "advice": "a",
                    "detailed_advice": "b",
                    "cutoff_note": "c",
                    "recommendation": ["first", "second", "third"]
                }
            }"#,
        )
        .expect("decode");
        let interpretation = response.interpretation.expect("interpretation");
        assert_eq!(interpretation.recommendation, vec!["first", "second", "third"]);
        assert_eq!(response.trunk_fat_percentage, Some(31.2));
    }
}
