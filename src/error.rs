use std::collections::BTreeMap;

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Field name to message, as shown under form inputs.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Please correct the highlighted fields")]
    Validation(FieldErrors),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("Invalid setting value: {0}")]
    InvalidSetting(String),
}

impl ClientError {
    /// Builds the error for a non-2xx response from its status and JSON body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let json: Option<Value> = serde_json::from_str(body).ok();

        if status == StatusCode::BAD_REQUEST
            && let Some(fields) = json.as_ref().and_then(extract_field_errors)
            && !fields.is_empty()
        {
            return ClientError::Validation(fields);
        }

        let message = json
            .as_ref()
            .and_then(extract_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            _ => ClientError::Api { status, message },
        }
    }

    /// Text for an alert.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(err) if err.is_timeout() => "The server took too long to respond".into(),
            ClientError::Http(_) => "Could not reach the server".into(),
            ClientError::Api { message, .. }
            | ClientError::NotFound(message)
            | ClientError::Unauthorized(message)
            | ClientError::Forbidden(message) => message.clone(),
            ClientError::Validation(_) => self.to_string(),
            ClientError::Storage(_) => "Could not access local storage".into(),
            ClientError::Json(_) | ClientError::UnexpectedResponse(_) => {
                "Unexpected response from the server".into()
            }
            ClientError::Url(err) => format!("Invalid address: {err}"),
            ClientError::InvalidSetting(msg) => msg.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }
}

fn extract_message(body: &Value) -> Option<String> {
    ["msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Accepts `errors: [{param|path|field, msg}]` and `errors: {field: msg}`.
fn extract_field_errors(body: &Value) -> Option<FieldErrors> {
    match body.get("errors")? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| {
                    let field = ["param", "path", "field"]
                        .iter()
                        .find_map(|key| item.get(*key).and_then(Value::as_str))?;
                    let msg = extract_message(item).unwrap_or_else(|| "Invalid value".into());
                    Some((field.to_string(), msg))
                })
                .collect(),
        ),
        Value::Object(map) => Some(
            map.iter()
                .map(|(field, value)| {
                    let msg = match value {
                        Value::String(s) => s.clone(),
                        other => extract_message(other).unwrap_or_else(|| "Invalid value".into()),
                    };
                    (field.clone(), msg)
                })
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_msg_envelope() {
        let err = ClientError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"msg":"Server Error"}"#,
        );
        assert_eq!(err.user_message(), "Server Error");
    }

    #[test]
    fn test_message_falls_back_to_reason() {
        let err = ClientError::from_response(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.user_message(), "Bad Gateway");
    }

    #[test]
    fn test_not_found_mapping() {
        let err = ClientError::from_response(StatusCode::NOT_FOUND, r#"{"msg":"Class not found"}"#);
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Class not found");
    }

    #[test]
    fn test_field_errors_array() {
        let body = r#"{"errors":[{"param":"email","msg":"Email is invalid"},{"path":"phone","msg":"Phone is required"}]}"#;
        let ClientError::Validation(fields) = ClientError::from_response(StatusCode::BAD_REQUEST, body)
        else {
            panic!("expected validation error");
        };
        assert_eq!(fields["email"], "Email is invalid");
        assert_eq!(fields["phone"], "Phone is required");
    }

    #[test]
    fn test_field_errors_object() {
        let body = r#"{"errors":{"name":"Name is taken"}}"#;
        let ClientError::Validation(fields) = ClientError::from_response(StatusCode::BAD_REQUEST, body)
        else {
            panic!("expected validation error");
        };
        assert_eq!(fields["name"], "Name is taken");
    }

    #[test]
    fn test_bad_request_without_fields() {
        let err = ClientError::from_response(StatusCode::BAD_REQUEST, r#"{"msg":"Member already checked in"}"#);
        assert_eq!(err.user_message(), "Member already checked in");
        assert!(matches!(err, ClientError::Api { .. }));
    }
}
