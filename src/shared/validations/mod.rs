//! Client-side input validation, run before any network call.

use validator::{Validate, ValidationErrors};

use crate::shared::types::errors::{ClientError, ClientResult};

/// Run `validator` rules on a request body and flatten the field errors
/// into a single [`ClientError::Validation`].
pub fn validate_request<T: Validate>(request: &T) -> ClientResult<()> {
    request
        .validate()
        .map_err(|errors| ClientError::Validation(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut field_errors: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let msg = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{:?}", e.code));
                format!("{}: {}", field, msg)
            })
        })
        .collect();
    field_errors.sort();

    if field_errors.is_empty() {
        "Validation failed".to_string()
    } else {
        field_errors.join("; ")
    }
}

/// Cancellation requests must say why.
pub fn validate_reason(reason: &str) -> ClientResult<&str> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ClientError::Validation(
            "cancellation reason is required".into(),
        ));
    }
    Ok(reason)
}
