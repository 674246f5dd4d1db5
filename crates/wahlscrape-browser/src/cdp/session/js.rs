//! Script evaluation.

use serde_json::{Value, json};

use crate::cdp::error::CdpError;

use super::core::PageSession;

impl PageSession {
    /// Evaluate an expression and return its value by value.
    ///
    /// An alert blocks the renderer until it is handled, so the call races
    /// the dialog event and fails with [`CdpError::DialogOpened`].
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let params = json!({
            "expression": expression,
            "returnByValue": true,
            "awaitPromise": true,
        });

        let result = tokio::select! {
            result = self.call("Runtime.evaluate", Some(params)) => result?,
            message = self.next_dialog() => return Err(CdpError::DialogOpened(message)),
        };

        match Self::exception_text(&result) {
            Some(text) => Err(CdpError::Script(text)),
            None => Ok(result["result"]["value"].clone()),
        }
    }

    /// Evaluate and coerce to a string; non-strings become empty.
    pub async fn evaluate_string(&self, expression: &str) -> Result<String, CdpError> {
        let value = self.evaluate(expression).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub(crate) fn exception_text(result: &Value) -> Option<String> {
        let exception = result.get("exceptionDetails")?;
        let text = exception["exception"]["description"]
            .as_str()
            .or_else(|| exception["text"].as_str())
            .unwrap_or("Unknown error");
        Some(text.to_string())
    }
}
