//! Element locators and URL conditions.

use std::fmt;

/// Identifies an element: CSS selector, optional text filter, and match position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub css: String,
    /// Only elements whose text contains this value match.
    pub text: Option<String>,
    pub ignore_case: bool,
    /// Zero-based position among the matching elements.
    pub nth: usize,
}

impl Locator {
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text: None,
            ignore_case: false,
            nth: 0,
        }
    }

    /// Restrict matches to elements whose text contains `text`.
    pub fn containing(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    pub fn nth(mut self, nth: usize) -> Self {
        self.nth = nth;
        self
    }

    /// Locator for `child_css` descendants of this locator's CSS.
    pub fn within(&self, child_css: &str) -> Locator {
        Locator::css(format!("{} {}", self.css, child_css))
    }

    /// Whether `candidate` passes the text filter.
    pub fn text_matches(&self, candidate: &str) -> bool {
        match &self.text {
            None => true,
            Some(needle) if self.ignore_case => candidate
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Some(needle) => candidate.contains(needle.as_str()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.css)?;
        if let Some(text) = &self.text {
            write!(f, " containing '{}'", text)?;
            if self.ignore_case {
                write!(f, " (any case)")?;
            }
        }
        if self.nth > 0 {
            write!(f, " #{}", self.nth)?;
        }
        Ok(())
    }
}

/// Condition on the current page address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlCondition {
    /// The address differs from the given one.
    ChangedFrom(String),
    /// The address contains the given fragment.
    Contains(String),
}

impl UrlCondition {
    pub fn matches(&self, url: &str) -> bool {
        match self {
            UrlCondition::ChangedFrom(previous) => url != previous,
            UrlCondition::Contains(fragment) => url.contains(fragment.as_str()),
        }
    }
}

impl fmt::Display for UrlCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlCondition::ChangedFrom(previous) => write!(f, "URL to change from {}", previous),
            UrlCondition::Contains(fragment) => write!(f, "URL containing {}", fragment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_matches_case_sensitive() {
        let loc = Locator::css("a").containing("mehr");
        assert!(loc.text_matches("mehr ..."));
        assert!(!loc.text_matches("Mehr ..."));
    }

    #[test]
    fn test_text_matches_ignore_case() {
        let loc = Locator::css("td").containing("bundestag").ignoring_case();
        assert!(loc.text_matches("Bundestagswahl 2021"));
        assert!(!loc.text_matches("Landtagswahl"));
    }

    #[test]
    fn test_text_matches_without_filter() {
        assert!(Locator::css("tr").text_matches(""));
    }

    #[test]
    fn test_within_composes_descendant() {
        let row = Locator::css("#ergebnisTabelle tbody tr:nth-child(3)");
        let cell = row.within("td:nth-child(3)");
        assert_eq!(cell.css, "#ergebnisTabelle tbody tr:nth-child(3) td:nth-child(3)");
        assert!(cell.text.is_none());
    }

    #[test]
    fn test_locator_display() {
        let loc = Locator::css("a.dropdown-item").containing("Open Data");
        assert_eq!(loc.to_string(), "'a.dropdown-item' containing 'Open Data'");
        assert_eq!(Locator::css("a").nth(2).to_string(), "'a' #2");
    }

    #[test]
    fn test_url_condition() {
        let changed = UrlCondition::ChangedFrom("https://a/x".to_string());
        assert!(!changed.matches("https://a/x"));
        assert!(changed.matches("https://a/y"));

        let contains = UrlCondition::Contains("ergebnis.html".to_string());
        assert!(contains.matches("https://a/2021/ergebnis.html#top"));
        assert!(!contains.matches("https://a/2021/index.html"));
    }
}
