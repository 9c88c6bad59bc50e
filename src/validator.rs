// src/validator.rs
use reqwest::Url;
use serde_json::Value;

use crate::errors::Rejection;

/// Status marker the dog API puts next to a usable payload.
pub const SUCCESS_MARKER: &str = "success";

/// Schemes a browser can load an `<img src>` from.
const IMAGE_SCHEMES: [&str; 2] = ["http", "https"];

/// An image reference that has passed validation.
///
/// `url` is the upstream `message` exactly as sent; parsing is only a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogImage {
    pub url: String,
}

/// Which optional checks to apply.
#[derive(Debug, Clone, Copy)]
pub struct ValidationPolicy {
    pub require_success_status: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            require_success_status: true,
        }
    }
}

/// Checks an upstream payload, in order: object shape, string `message`,
/// `status` marker (if required by `policy`), then URL syntax.
pub fn validate(payload: &Value, policy: ValidationPolicy) -> Result<DogImage, Rejection> {
    let object = payload.as_object().ok_or_else(|| Rejection::Shape {
        reason: "payload is not an object".to_string(),
        payload: payload.to_string(),
    })?;

    let message = match object.get("message") {
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(Rejection::Shape {
                reason: "`message` is not a string".to_string(),
                payload: payload.to_string(),
            });
        }
        None => {
            return Err(Rejection::Shape {
                reason: "`message` is missing".to_string(),
                payload: payload.to_string(),
            });
        }
    };

    if policy.require_success_status {
        match object.get("status") {
            Some(Value::String(s)) if s == SUCCESS_MARKER => {}
            other => {
                return Err(Rejection::StatusMarker {
                    found: other.map(|v| match v {
                        Value::String(s) => s.clone(),
                        v => v.to_string(),
                    }),
                });
            }
        }
    }

    let parsed = Url::parse(message).map_err(|e| Rejection::UrlFormat {
        value: message.clone(),
        reason: e.to_string(),
    })?;
    if !IMAGE_SCHEMES.contains(&parsed.scheme()) {
        return Err(Rejection::UrlFormat {
            value: message.clone(),
            reason: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }

    Ok(DogImage { url: message.clone() })
}

/// Decodes a raw body and validates it. A body that is not JSON is a shape rejection.
pub fn validate_body(body: &[u8], policy: ValidationPolicy) -> Result<DogImage, Rejection> {
    let payload: Value = serde_json::from_slice(body).map_err(|e| Rejection::Shape {
        reason: format!("body is not JSON: {}", e),
        payload: String::from_utf8_lossy(body).into_owned(),
    })?;
    validate(&payload, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IMAGE: &str = "https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg";

    #[test]
    fn test_accepts_well_formed_payload() {
        let image = validate(&json!({ "message": IMAGE, "status": "success" }), ValidationPolicy::default()).unwrap();
        assert_eq!(image.url, IMAGE);
    }

    #[test]
    fn test_rejects_non_object() {
        for payload in [json!(null), json!([IMAGE]), json!(IMAGE), json!(42)] {
            let err = validate(&payload, ValidationPolicy::default()).unwrap_err();
            assert_eq!(err.kind(), "shape", "payload {}", payload);
        }
    }

    #[test]
    fn test_rejects_missing_or_non_string_message() {
        let missing = validate(&json!({ "status": "success" }), ValidationPolicy::default()).unwrap_err();
        assert!(matches!(missing, Rejection::Shape { ref reason, .. } if reason.contains("missing")));

        let numeric = validate(&json!({ "message": 7, "status": "success" }), ValidationPolicy::default()).unwrap_err();
        assert!(matches!(numeric, Rejection::Shape { ref reason, .. } if reason.contains("not a string")));
    }

    #[test]
    fn test_shape_is_checked_before_status() {
        let err = validate(&json!({ "message": 7, "status": "error" }), ValidationPolicy::default()).unwrap_err();
        assert_eq!(err.kind(), "shape");
    }

    #[test]
    fn test_status_marker() {
        let wrong = validate(&json!({ "message": IMAGE, "status": "error" }), ValidationPolicy::default()).unwrap_err();
        assert_eq!(wrong, Rejection::StatusMarker { found: Some("error".to_string()) });

        let missing = validate(&json!({ "message": IMAGE }), ValidationPolicy::default()).unwrap_err();
        assert_eq!(missing, Rejection::StatusMarker { found: None });

        let relaxed = ValidationPolicy { require_success_status: false };
        assert!(validate(&json!({ "message": IMAGE, "status": "error" }), relaxed).is_ok());
        assert!(validate(&json!({ "message": IMAGE }), relaxed).is_ok());
    }

    #[test]
    fn test_rejects_invalid_url() {
        for bad in ["not a url", "", "/breeds/hound.jpg", "images.dog.ceo/x.jpg"] {
            let err = validate(&json!({ "message": bad, "status": "success" }), ValidationPolicy::default()).unwrap_err();
            assert!(matches!(err, Rejection::UrlFormat { ref value, .. } if value == bad), "value {:?}", bad);
        }
    }

    #[test]
    fn test_keeps_upstream_url_verbatim() {
        for raw in [
            "https://images.dog.ceo",
            "HTTPS://Images.Dog.CEO/x.jpg",
            "https://images.dog.ceo/breeds/pug/a b.jpg",
        ] {
            let image = validate(&json!({ "message": raw, "status": "success" }), ValidationPolicy::default()).unwrap();
            assert_eq!(image.url, raw);
        }
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        for bad in ["javascript:alert(1)", "data:image/png;base64,AAAA", "mailto:dog@dog.ceo", "ftp://dog.ceo/x.jpg"] {
            let err = validate(&json!({ "message": bad, "status": "success" }), ValidationPolicy::default()).unwrap_err();
            assert!(
                matches!(err, Rejection::UrlFormat { ref reason, .. } if reason.contains("scheme")),
                "value {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_validate_body_rejects_non_json() {
        let err = validate_body(b"<html>oops</html>", ValidationPolicy::default()).unwrap_err();
        assert!(matches!(err, Rejection::Shape { ref payload, .. } if payload == "<html>oops</html>"));
    }
}
