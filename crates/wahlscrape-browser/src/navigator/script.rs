//! JavaScript expressions evaluated in the page.
//!
//! Every element operation resolves its [`Locator`] in the page and evaluates
//! to `{found, value}` so a missing element is distinguishable from a null value.

use serde::Deserialize;
use serde_json::Value;

use super::locator::Locator;

/// Result of an element expression.
#[derive(Debug, Deserialize)]
pub struct ElementProbe {
    pub found: bool,
    #[serde(default)]
    pub value: Value,
}

impl ElementProbe {
    /// The value when the element was found.
    pub fn into_value(self) -> Option<Value> {
        self.found.then_some(self.value)
    }
}

fn js_string(value: &str) -> String {
    // JSON string literals are valid JavaScript string literals.
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Expression evaluating to the located element or `null`.
pub fn resolve(locator: &Locator) -> String {
    let text = locator
        .text
        .as_deref()
        .map(js_string)
        .unwrap_or_else(|| "null".to_string());

    format!(
        "(() => {{ \
            const all = Array.from(document.querySelectorAll({css})); \
            const needle = {text}; \
            const hits = needle === null ? all : all.filter(el => {{ \
                const t = el.innerText || el.textContent || ''; \
                return {ci} ? t.toLowerCase().includes(needle.toLowerCase()) : t.includes(needle); \
            }}); \
            return hits[{nth}] || null; \
        }})()",
        css = js_string(&locator.css),
        text = text,
        ci = locator.ignore_case,
        nth = locator.nth,
    )
}

/// Wrap `body` (an expression over `el`) so it runs against the located element.
pub fn with_element(locator: &Locator, body: &str) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return {{ found: false }}; return {{ found: true, value: ({}) }}; }})()",
        resolve(locator),
        body
    )
}

/// Index of the first locator with a match, or -1.
pub fn first_present(locators: &[Locator]) -> String {
    let resolvers: Vec<String> = locators.iter().map(resolve).collect();
    format!(
        "[{}].findIndex(el => el !== null)",
        resolvers.join(", ")
    )
}

pub const TEXT: &str = "(el.innerText || el.textContent || '').trim()";

pub const HREF: &str = "el.href ? String(el.href) : null";

pub const CLICKABLE: &str = "el.getClientRects().length > 0 \
    && !el.disabled \
    && getComputedStyle(el).visibility !== 'hidden' \
    && getComputedStyle(el).pointerEvents !== 'none'";

pub const SCROLL_INTO_VIEW: &str = "(el.scrollIntoView(true), true)";

/// Scroll, then click on the next task so a dialog raised by the click
/// does not block this evaluation.
pub const CLICK: &str = "(el.scrollIntoView(true), setTimeout(() => el.click(), 0), true)";

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_escapes_selector_and_text() {
        let loc = Locator::css("a[aria-label='Next']").containing("say \"hi\"");
        let expr = resolve(&loc);
        assert!(expr.contains(r#"querySelectorAll("a[aria-label='Next']")"#));
        assert!(expr.contains(r#"const needle = "say \"hi\"""#));
        assert!(expr.contains("return hits[0] || null"));
    }

    #[test]
    fn test_resolve_without_text_filter() {
        let expr = resolve(&Locator::css("td").nth(3));
        assert!(expr.contains("const needle = null"));
        assert!(expr.contains("hits[3]"));
    }

    #[test]
    fn test_resolve_case_flag() {
        let expr = resolve(&Locator::css("td").containing("bundestag").ignoring_case());
        assert!(expr.contains("return true ?"));
    }

    #[test]
    fn test_first_present_lists_all() {
        let expr = first_present(&[Locator::css("a"), Locator::css("b")]);
        assert!(expr.starts_with("[(() =>"));
        assert!(expr.ends_with(".findIndex(el => el !== null)"));
        assert_eq!(expr.matches("querySelectorAll").count(), 2);
    }

    #[test]
    fn test_element_probe() {
        let found: ElementProbe = serde_json::from_value(json!({"found": true, "value": "x"})).unwrap();
        assert_eq!(found.into_value(), Some(json!("x")));

        let missing: ElementProbe = serde_json::from_value(json!({"found": false})).unwrap();
        assert_eq!(missing.into_value(), None);
    }
}
