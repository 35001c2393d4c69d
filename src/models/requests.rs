use serde::{Deserialize, Serialize};

/// Body of `POST /v1/synthesize`.
///
/// A `speaking_rate` of zero (or a missing field) means "use the backend
/// default"; the client omits the field entirely in that case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(default)]
    pub ssml: String,
    #[serde(default, skip_serializing_if = "is_default_rate")]
    pub speaking_rate: f64,
}

impl SynthesizeRequest {
    pub fn new(ssml: impl Into<String>, speaking_rate: f64) -> Self {
        Self {
            ssml: ssml.into(),
            speaking_rate,
        }
    }

    /// The rate to forward upstream, if any.
    pub fn effective_rate(&self) -> Option<f64> {
        (self.speaking_rate > 0.0).then_some(self.speaking_rate)
    }
}

fn is_default_rate(rate: &f64) -> bool {
    *rate == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesize_request_full_deserialization() {
        let json = r#"{
            "ssml": "<speak>Hello</speak>",
            "speaking_rate": 1.25
        }"#;

        let req: SynthesizeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.ssml, "<speak>Hello</speak>");
        assert_eq!(req.speaking_rate, 1.25);
        assert_eq!(req.effective_rate(), Some(1.25));
    }

    #[test]
    fn test_synthesize_request_minimal_deserialization() {
        let json = r#"{"ssml": "<speak>Hi</speak>"}"#;

        let req: SynthesizeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.speaking_rate, 0.0);
        assert_eq!(req.effective_rate(), None);
    }

    #[test]
    fn test_synthesize_request_missing_ssml_is_empty() {
        let req: SynthesizeRequest = serde_json::from_str("{}").unwrap();

        assert!(req.ssml.is_empty());
    }

    #[test]
    fn test_negative_rate_uses_default() {
        let req = SynthesizeRequest::new("<speak>x</speak>", -1.0);
        assert_eq!(req.effective_rate(), None);
    }

    #[test]
    fn test_zero_rate_omitted_when_serialized() {
        let json = serde_json::to_string(&SynthesizeRequest::new("<speak>x</speak>", 0.0)).unwrap();

        assert_eq!(json, r#"{"ssml":"<speak>x</speak>"}"#);
    }

    #[test]
    fn test_rate_serialized_when_set() {
        let json = serde_json::to_string(&SynthesizeRequest::new("<speak>x</speak>", 0.9)).unwrap();

        assert!(json.contains("\"speaking_rate\":0.9"));
    }

    #[test]
    fn test_synthesize_request_invalid_json_fails() {
        let json = r#"{"ssml": "Test", invalid}"#;

        let result: Result<SynthesizeRequest, _> = serde_json::from_str(json);

        assert!(result.is_err());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let json = r#"{"ssml": "<speak>a</speak>", "voice": "ignored"}"#;

        let req: SynthesizeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.ssml, "<speak>a</speak>");
    }
}
