//! Response interpretation for the Bitfinex v1 API
//!
//! Bitfinex signals failure at two independent layers: the HTTP status
//! line, and an `error`/`message` field inside an otherwise well-formed
//! JSON body, sometimes under HTTP 200. Both layers are checked here and
//! normalized into [`RestError`].

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{RestError, RestResult};

const SNIPPET_LIMIT: usize = 200;

/// Outcome of interpreting a delivered HTTP response
#[derive(Debug)]
pub(crate) enum Interpreted {
    /// Decoded JSON body
    Json(Value),
    /// Raw body bytes, for callers that did not ask for JSON
    Raw(Vec<u8>),
}

/// Classify a delivered response into a success value or a failure
///
/// Policy, in order: a non-2xx status is an [`RestError::Http`] regardless
/// of body content; a body that fails to parse is
/// [`RestError::MalformedResponse`] when JSON was wanted and a raw success
/// otherwise; a parsed object carrying an `error` or `message` field is an
/// [`RestError::Api`] even under HTTP 200.
pub(crate) fn interpret(status: StatusCode, body: &[u8], want_json: bool) -> RestResult<Interpreted> {
    if !status.is_success() {
        return Err(RestError::Http {
            status: status.as_u16(),
        });
    }

    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) if want_json => return Err(RestError::MalformedResponse(snippet(body))),
        Err(_) => return Ok(Interpreted::Raw(body.to_vec())),
    };

    if let Some(message) = error_message(&value) {
        return Err(RestError::Api(message));
    }

    if want_json {
        Ok(Interpreted::Json(value))
    } else {
        Ok(Interpreted::Raw(body.to_vec()))
    }
}

/// Interpret a response from which a JSON value is required
pub(crate) fn interpret_json(status: StatusCode, body: &[u8]) -> RestResult<Value> {
    match interpret(status, body, true)? {
        Interpreted::Json(value) => Ok(value),
        // want_json=true never yields Raw; keep the failure typed anyway
        Interpreted::Raw(raw) => Err(RestError::MalformedResponse(snippet(&raw))),
    }
}

/// Decode an interpreted JSON value into a typed response
pub(crate) fn decode<T: serde::de::DeserializeOwned>(value: Value) -> RestResult<T> {
    serde_json::from_value(value).map_err(|e| RestError::MalformedResponse(e.to_string()))
}

/// Extract the error text from an `error`/`message` field, if present
///
/// Empty strings and explicit nulls do not count as errors, matching the
/// service's habit of including vacuous fields.
fn error_message(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    let field = object.get("error").or_else(|| object.get("message"))?;

    match field {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() > SNIPPET_LIMIT {
        let head: String = text.chars().take(SNIPPET_LIMIT).collect();
        format!("{}...", head)
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_beats_http_200() {
        let result = interpret_json(StatusCode::OK, br#"{"error":"bad request"}"#);
        assert!(matches!(result, Err(RestError::Api(msg)) if msg == "bad request"));
    }

    #[test]
    fn test_message_field_also_signals_error() {
        let result = interpret_json(StatusCode::OK, br#"{"message":"Invalid API key"}"#);
        assert!(matches!(result, Err(RestError::Api(msg)) if msg == "Invalid API key"));
    }

    #[test]
    fn test_http_error_wins_regardless_of_body() {
        let result = interpret_json(StatusCode::INTERNAL_SERVER_ERROR, br#"{"error":"x"}"#);
        assert!(matches!(result, Err(RestError::Http { status: 500 })));

        let result = interpret_json(StatusCode::BAD_REQUEST, b"not even json");
        assert!(matches!(result, Err(RestError::Http { status: 400 })));
    }

    #[test]
    fn test_unparsable_body_when_json_wanted() {
        let result = interpret_json(StatusCode::OK, b"<html>maintenance</html>");
        assert!(matches!(result, Err(RestError::MalformedResponse(_))));
    }

    #[test]
    fn test_unparsable_body_passes_through_in_raw_mode() {
        let result = interpret(StatusCode::OK, b"plain text", false).unwrap();
        assert!(matches!(result, Interpreted::Raw(raw) if raw == b"plain text"));
    }

    #[test]
    fn test_json_body_still_checked_for_errors_in_raw_mode() {
        let result = interpret(StatusCode::OK, br#"{"error":"nope"}"#, false);
        assert!(matches!(result, Err(RestError::Api(_))));
    }

    #[test]
    fn test_empty_or_null_error_fields_are_not_errors() {
        let value = interpret_json(StatusCode::OK, br#"{"error":"","mid":"1.0"}"#).unwrap();
        assert_eq!(value["mid"], "1.0");

        let value = interpret_json(StatusCode::OK, br#"{"error":null}"#).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn test_success_returns_parsed_value() {
        let value = interpret_json(StatusCode::OK, br#"["btcusd","ethusd"]"#).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_decode_mismatch_is_malformed() {
        let value = serde_json::json!({"unexpected": true});
        let result: RestResult<Vec<String>> = decode(value);
        assert!(matches!(result, Err(RestError::MalformedResponse(_))));
    }
}
