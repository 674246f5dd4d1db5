//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_site(config, &mut result);
        Self::validate_election(config, &mut result);
        Self::validate_selectors(config, &mut result);
        Self::validate_scrape(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_report(config, &mut result);
        Self::validate_batches(config, &mut result);

        Ok(result)
    }

    fn validate_site(config: &Config, result: &mut ValidationResult) {
        let url = &config.site.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "site.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if config.site.page_size == 0 {
            result.add_error(ValidationError::new(
                "site.page_size",
                "page_size must be greater than 0",
            ));
        }

        if config.site.total_municipalities == 0 {
            result.add_error(ValidationError::new(
                "site.total_municipalities",
                "total_municipalities must be greater than 0",
            ));
        }

        if config.site.link_suffix.is_empty() {
            result.add_warning(ValidationWarning::new(
                "site.link_suffix",
                "Empty link suffix matches every link on the open-data page",
            ));
        }
    }

    fn validate_election(config: &Config, result: &mut ValidationResult) {
        if config.election.year.trim().is_empty() {
            result.add_error(ValidationError::new("election.year", "year cannot be empty"));
        }
        if config.election.keyword.trim().is_empty() {
            result.add_error(ValidationError::new(
                "election.keyword",
                "keyword cannot be empty",
            ));
        }
    }

    fn validate_selectors(config: &Config, result: &mut ValidationResult) {
        let selectors = &config.selectors;

        if !selectors.listing_row.contains("{row}") {
            result.add_error(ValidationError::new(
                "selectors.listing_row",
                "listing_row must contain the {row} placeholder",
            ));
        }

        if selectors.next_page.is_empty() {
            result.add_error(ValidationError::new(
                "selectors.next_page",
                "At least one next-page selector is required",
            ));
        }

        let required = [
            ("selectors.region_cell", &selectors.region_cell),
            ("selectors.name_link", &selectors.name_link),
            ("selectors.election_cell", &selectors.election_cell),
            ("selectors.election_rows", &selectors.election_rows),
            ("selectors.more_link.css", &selectors.more_link.css),
            ("selectors.open_data_link.css", &selectors.open_data_link.css),
        ];
        for (path, value) in required {
            if value.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Selector cannot be empty"));
            }
        }
    }

    fn validate_scrape(config: &Config, result: &mut ValidationResult) {
        if config.scrape.max_attempts == 0 {
            result.add_error(ValidationError::new(
                "scrape.max_attempts",
                "max_attempts must be greater than 0",
            ));
        }

        if config.scrape.max_attempts > 10 {
            result.add_warning(ValidationWarning::new(
                "scrape.max_attempts",
                "max_attempts is very high (>10), failing municipalities will stall the batch",
            ));
        }

        if config.scrape.detail_max_chars == 0 {
            result.add_warning(ValidationWarning::new(
                "scrape.detail_max_chars",
                "Failure details will be dropped from the ledger",
            ));
        }

        if config.scrape.batch_timeout_secs == Some(0) {
            result.add_error(ValidationError::new(
                "scrape.batch_timeout_secs",
                "batch_timeout_secs must be greater than 0 when set",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if !config.browser.headless {
            result.add_warning(ValidationWarning::new(
                "browser.headless",
                "Headful mode opens a visible window per attempt",
            ));
        }

        if let Some(ref path) = config.browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome binary does not exist: {:?}", path),
                ));
            }
        }
    }

    fn validate_report(config: &Config, result: &mut ValidationResult) {
        let cutoff = config.report.fuzzy_cutoff;
        if !(cutoff > 0.0 && cutoff <= 1.0) {
            result.add_error(ValidationError::new(
                "report.fuzzy_cutoff",
                "fuzzy_cutoff must be in (0, 1]",
            ));
        }
    }

    fn validate_batches(config: &Config, result: &mut ValidationResult) {
        let total = config.site.total_municipalities;

        if config.batches.is_empty() {
            result.add_warning(ValidationWarning::new(
                "batches",
                "No batches configured, nothing can be selected",
            ));
        }

        for batch in &config.batches {
            let path = format!("batches.{}", batch.name);
            if batch.start == 0 || batch.end > total {
                result.add_error(ValidationError::new(
                    path.clone(),
                    format!("Range must lie within 1..={}", total),
                ));
            }
            if batch.end < batch.start {
                result.add_error(ValidationError::new(path, "end must not be below start"));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
