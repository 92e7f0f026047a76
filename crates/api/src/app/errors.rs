use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_infra::ServiceError;
use stockroom_infra::services::Resource;
use stockroom_inventory::{FieldError, Localizer, ValidationReport};

/// Map a service failure to the JSON error contract.
///
/// Persistence details never reach the client; they were already logged.
pub fn service_error_to_response(err: ServiceError, texts: &Localizer) -> axum::response::Response {
    match err {
        ServiceError::Validation(report) => validation_error(&report, texts),
        ServiceError::InsufficientStock { report, .. } => json_error_with_fields(
            StatusCode::BAD_REQUEST,
            "insufficient_stock",
            report
                .errors()
                .first()
                .map(|e| texts.violation(e))
                .unwrap_or_else(|| texts.validation_failed().to_string()),
            field_list(report.errors(), texts),
        ),
        ServiceError::NotFound(Resource::Item) => {
            json_error(StatusCode::NOT_FOUND, "not_found", texts.not_found())
        }
        ServiceError::NotFound(Resource::Notification) => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            texts.notification_not_found(),
        ),
        ServiceError::DuplicateName(name) => {
            json_error(StatusCode::CONFLICT, "conflict", texts.duplicate_name(&name))
        }
        ServiceError::StaleWrite(_) => {
            json_error(StatusCode::CONFLICT, "conflict", texts.stale_write())
        }
        ServiceError::Persistence(_) | ServiceError::Invariant(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "operation_failed",
            texts.operation_failed(),
        ),
    }
}

pub fn validation_error(report: &ValidationReport, texts: &Localizer) -> axum::response::Response {
    json_error_with_fields(
        StatusCode::BAD_REQUEST,
        "validation_error",
        texts.validation_failed(),
        field_list(report.errors(), texts),
    )
}

/// `[{"field": ..., "message": ...}]` for a set of field errors or warnings.
pub fn field_list(errors: &[FieldError], texts: &Localizer) -> serde_json::Value {
    errors
        .iter()
        .map(|e| {
            json!({
                "field": e.field.code(),
                "message": texts.violation(e),
            })
        })
        .collect()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    json_error_with_fields(status, code, message, json!([]))
}

pub fn json_error_with_fields(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    fields: serde_json::Value,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "fields": fields,
        })),
    )
        .into_response()
}

/// 400 for a malformed path or query identifier.
pub fn invalid_id(what: &str) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_id",
        format!("invalid {what} id"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ItemId;
    use stockroom_inventory::{Field, Unit, Violation};

    #[test]
    fn status_codes_follow_error_kind() {
        let texts = Localizer::default();
        let cases = [
            (
                ServiceError::Validation(ValidationReport::single(Field::Name, Violation::Required)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::InsufficientStock {
                    available: rust_decimal::Decimal::TEN,
                    unit: Unit::Kg,
                    report: ValidationReport::single(
                        Field::Quantity,
                        Violation::InsufficientStock {
                            available: rust_decimal::Decimal::TEN,
                            unit: Unit::Kg,
                        },
                    ),
                },
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::NotFound(Resource::Item), StatusCode::NOT_FOUND),
            (ServiceError::StaleWrite(ItemId::new()), StatusCode::CONFLICT),
            (ServiceError::DuplicateName("Tomate".into()), StatusCode::CONFLICT),
            (
                ServiceError::Persistence("connection reset".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(service_error_to_response(err, &texts).status(), status);
        }
    }
}
