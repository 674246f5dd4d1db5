use serde_json::json;

use super::core::PageSession;

#[test]
fn test_exception_text_prefers_description() {
    let result = json!({
        "result": {"type": "object"},
        "exceptionDetails": {
            "text": "Uncaught",
            "exception": {"description": "TypeError: x is null"}
        }
    });
    assert_eq!(
        PageSession::exception_text(&result).as_deref(),
        Some("TypeError: x is null")
    );
}

#[test]
fn test_exception_text_falls_back_to_text() {
    let result = json!({"exceptionDetails": {"text": "SyntaxError"}});
    assert_eq!(PageSession::exception_text(&result).as_deref(), Some("SyntaxError"));
}

#[test]
fn test_exception_text_absent() {
    let result = json!({"result": {"type": "string", "value": "ok"}});
    assert!(PageSession::exception_text(&result).is_none());
}

#[test]
fn test_navigation_error() {
    let failed = json!({"frameId": "F", "errorText": "net::ERR_NAME_NOT_RESOLVED"});
    assert_eq!(
        PageSession::navigation_error(&failed).as_deref(),
        Some("net::ERR_NAME_NOT_RESOLVED")
    );
    assert!(PageSession::navigation_error(&json!({"frameId": "F", "loaderId": "L"})).is_none());
    assert!(PageSession::navigation_error(&json!({"frameId": "F", "errorText": ""})).is_none());
}

#[test]
fn test_is_loaded() {
    assert!(PageSession::is_loaded("complete"));
    assert!(PageSession::is_loaded("interactive"));
    assert!(!PageSession::is_loaded("loading"));
}
