//! Target site, election and selector configuration.

use serde::{Deserialize, Serialize};

/// Target website configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Listing start page.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Rows per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Size of the municipality index space.
    #[serde(default = "default_total")]
    pub total_municipalities: u32,

    /// Region label whose municipalities are skipped.
    #[serde(default = "default_excluded_region")]
    pub excluded_region: String,

    /// URL marker of the election results page.
    #[serde(default = "default_results_marker")]
    pub results_url_marker: String,

    /// URL marker of the open-data page.
    #[serde(default = "default_open_data_marker")]
    pub open_data_url_marker: String,

    /// Suffix of downloadable link addresses.
    #[serde(default = "default_link_suffix")]
    pub link_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            total_municipalities: default_total(),
            excluded_region: default_excluded_region(),
            results_url_marker: default_results_marker(),
            open_data_url_marker: default_open_data_marker(),
            link_suffix: default_link_suffix(),
        }
    }
}

fn default_base_url() -> String {
    "https://wahlen.votemanager.de/".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_total() -> u32 {
    3175
}

fn default_excluded_region() -> String {
    "Bayern".to_string()
}

fn default_results_marker() -> String {
    "ergebnis.html".to_string()
}

fn default_open_data_marker() -> String {
    "opendata.html".to_string()
}

fn default_link_suffix() -> String {
    ".csv".to_string()
}

/// Which election to resolve on a municipality page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Substring the year cell must contain.
    #[serde(default = "default_year")]
    pub year: String,

    /// Substring the label cell must contain, compared case-insensitively.
    #[serde(default = "default_keyword")]
    pub keyword: String,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            keyword: default_keyword(),
        }
    }
}

fn default_year() -> String {
    "2021".to_string()
}

fn default_keyword() -> String {
    "bundestag".to_string()
}

/// A CSS selector optionally narrowed by the element's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSelector {
    pub css: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub ignore_case: bool,
}

impl ElementSelector {
    pub fn css(css: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text: None,
            ignore_case: false,
        }
    }

    pub fn with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            css: css.into(),
            text: Some(text.into()),
            ignore_case: false,
        }
    }
}

/// Page markup selectors.
///
/// These describe the third-party site and are expected to drift; keeping
/// them here lets a markup change be fixed without touching the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorsConfig {
    /// Listing row template; `{row}` is replaced by the 1-based row number.
    #[serde(default = "default_listing_row")]
    pub listing_row: String,

    /// Region cell, relative to the listing row.
    #[serde(default = "default_region_cell")]
    pub region_cell: String,

    /// Name link, relative to the listing row.
    #[serde(default = "default_name_link")]
    pub name_link: String,

    /// Equivalent "next page" affordances in priority order.
    #[serde(default = "default_next_page")]
    pub next_page: Vec<String>,

    /// Cells inspected to decide whether an election table is present.
    #[serde(default = "default_election_cell")]
    pub election_cell: String,

    /// Rows of the election table.
    #[serde(default = "default_election_rows")]
    pub election_rows: String,

    #[serde(default = "default_more_link")]
    pub more_link: ElementSelector,

    #[serde(default = "default_further_dropdown")]
    pub further_dropdown: ElementSelector,

    #[serde(default = "default_open_data_link")]
    pub open_data_link: ElementSelector,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            listing_row: default_listing_row(),
            region_cell: default_region_cell(),
            name_link: default_name_link(),
            next_page: default_next_page(),
            election_cell: default_election_cell(),
            election_rows: default_election_rows(),
            more_link: default_more_link(),
            further_dropdown: default_further_dropdown(),
            open_data_link: default_open_data_link(),
        }
    }
}

impl SelectorsConfig {
    /// Listing row selector for a 1-based row number.
    pub fn listing_row_for(&self, row: u32) -> String {
        self.listing_row.replace("{row}", &row.to_string())
    }
}

fn default_listing_row() -> String {
    "#ergebnisTabelle tbody tr:nth-child({row})".to_string()
}

fn default_region_cell() -> String {
    "td:nth-child(3)".to_string()
}

fn default_name_link() -> String {
    "td:nth-child(1) a".to_string()
}

fn default_next_page() -> Vec<String> {
    vec![
        "#ergebnisTabelle_next > a".to_string(),
        "#ergebnisTabelle_next a".to_string(),
        "a[aria-label='Next']".to_string(),
        ".paginate_button.next a".to_string(),
        ".page-item.next a".to_string(),
    ]
}

fn default_election_cell() -> String {
    "td".to_string()
}

fn default_election_rows() -> String {
    "table tbody tr".to_string()
}

fn default_more_link() -> ElementSelector {
    ElementSelector::with_text("a", "mehr")
}

fn default_further_dropdown() -> ElementSelector {
    ElementSelector::with_text("a.dropdown-toggle", "weitere")
}

fn default_open_data_link() -> ElementSelector {
    ElementSelector::with_text("a.dropdown-item", "Open Data")
}
