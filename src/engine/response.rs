//! Response normalization.
//!
//! The Editor plugin signals failure two ways depending on the command
//! handler's vintage: `{"status": "error", ...}` or `{"success": false, ...}`.
//! Callers see exactly one shape: `{"status": "error", "error": <message>}`.

use serde_json::{Value, json};

/// Coerce either failure convention to the canonical error mapping.
/// Non-error responses pass through untouched.
pub fn normalize(response: Value) -> Value {
    let failed = response.get("status").and_then(Value::as_str) == Some("error")
        || response.get("success").and_then(Value::as_bool) == Some(false);

    if !failed {
        return response;
    }

    let message = response
        .get("error")
        .and_then(Value::as_str)
        .or_else(|| response.get("message").and_then(Value::as_str))
        .unwrap_or("Unknown error");

    json!({ "status": "error", "error": message })
}

/// Synthesize the canonical error mapping for a locally detected failure.
pub fn error_response(message: impl Into<String>) -> Value {
    json!({ "status": "error", "error": message.into() })
}

pub fn is_error(response: &Value) -> bool {
    response.get("status").and_then(Value::as_str) == Some("error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_form_is_fixed_point() {
        let canonical = json!({ "status": "error", "error": "X" });
        assert_eq!(normalize(canonical.clone()), canonical);
    }

    #[test]
    fn success_false_convention_coerced() {
        let response = json!({ "success": false, "message": "X" });
        assert_eq!(
            normalize(response),
            json!({ "status": "error", "error": "X" })
        );
    }

    #[test]
    fn error_field_preferred_over_message() {
        let response = json!({ "status": "error", "error": "primary", "message": "secondary" });
        assert_eq!(
            normalize(response),
            json!({ "status": "error", "error": "primary" })
        );
    }

    #[test]
    fn missing_detail_defaults() {
        let response = json!({ "success": false });
        assert_eq!(
            normalize(response),
            json!({ "status": "error", "error": "Unknown error" })
        );
    }

    #[test]
    fn success_passes_through_untouched() {
        let response = json!({ "status": "success", "result": { "actors": [] } });
        assert_eq!(normalize(response.clone()), response);
        assert!(!is_error(&response));
    }
}
