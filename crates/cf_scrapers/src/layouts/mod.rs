use chrono_tz::Tz;
use scraper::Html;
use cf_core::{RawScheduleItem, Result, Speaker};

pub mod elm_europe;

pub use elm_europe::ElmEuropeLayout;

/// Knows where a particular conference site keeps its data.
///
/// Each site skin gets its own implementation so markup changes stay
/// contained in one file.
pub trait PageLayout: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    fn extract_speakers(&self, document: &Html) -> Result<Vec<Speaker>>;

    /// Rows whose time text cannot be read are left out
    fn extract_schedule(&self, document: &Html, timezone: Tz) -> Result<Vec<RawScheduleItem>>;
}

/// Common utilities for layouts
pub(crate) mod utils {
    use cf_core::{Error, Result};
    use scraper::{ElementRef, Selector};

    pub fn parse_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| Error::Selector(format!("{}: {}", selector, e)))
    }

    pub fn element_text(element: ElementRef) -> String {
        element.text().collect::<String>().trim().to_string()
    }

    /// Text of every match under `scope`, concatenated in document order
    pub fn select_text(scope: ElementRef, selector: &Selector) -> String {
        scope
            .select(selector)
            .flat_map(|el| el.text())
            .collect::<String>()
            .trim()
            .to_string()
    }

    pub fn select_attr(scope: ElementRef, selector: &Selector, attr: &str) -> Option<String> {
        scope
            .select(selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::to_string)
    }

    pub fn last_element_child(element: ElementRef) -> Option<ElementRef> {
        element.children().filter_map(ElementRef::wrap).last()
    }

    pub fn next_element_sibling(element: ElementRef) -> Option<ElementRef> {
        element.next_siblings().find_map(ElementRef::wrap)
    }
}
