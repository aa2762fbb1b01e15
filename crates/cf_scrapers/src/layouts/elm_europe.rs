use chrono_tz::Tz;
use scraper::{Html, Selector};
use cf_core::{RawScheduleItem, RawTalk, Result, ScheduleItem, Speaker};

use super::utils::{
    element_text, last_element_child, next_element_sibling, parse_selector, select_attr,
    select_text,
};
use super::PageLayout;
use crate::logging::Logger;
use crate::schedule_text::parse_schedule_text;

/// Bootstrap timeline markup used by elmeurope.org.
///
/// The speaker of a talk is the last element in the panel heading and the
/// description the last element in the panel body. Both are positional, so
/// a redesign of the page lands here.
#[derive(Debug)]
pub struct ElmEuropeLayout {
    speaker_card: Selector,
    speaker_name: Selector,
    speaker_image: Selector,
    speaker_sub: Selector,
    panel: Selector,
    panel_title: Selector,
    panel_heading: Selector,
    panel_body: Selector,
    panel_muted: Selector,
    logger: Logger,
}

impl ElmEuropeLayout {
    pub const NAME: &'static str = "elm-europe";

    pub fn new() -> Result<Self> {
        Ok(Self {
            speaker_card: parse_selector(".flex-speakers-container .speaker")?,
            speaker_name: parse_selector(".media-heading a")?,
            speaker_image: parse_selector(".img-circle")?,
            speaker_sub: parse_selector(".media-sub")?,
            panel: parse_selector(".timeline .timeline-panel")?,
            panel_title: parse_selector(".timeline-title")?,
            panel_heading: parse_selector(".timeline-heading")?,
            panel_body: parse_selector(".timeline-body")?,
            panel_muted: parse_selector(".text-muted")?,
            logger: Logger::new().with_prefix(format!("[{}]", Self::NAME)),
        })
    }
}

impl PageLayout for ElmEuropeLayout {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn extract_speakers(&self, document: &Html) -> Result<Vec<Speaker>> {
        let speakers: Vec<Speaker> = document
            .select(&self.speaker_card)
            .map(|card| {
                let bio = card
                    .select(&self.speaker_sub)
                    .filter_map(next_element_sibling)
                    .map(element_text)
                    .collect::<String>();

                Speaker {
                    name: select_text(card, &self.speaker_name),
                    image: select_attr(card, &self.speaker_image, "data-src"),
                    bio,
                }
            })
            .collect();

        self.logger.debug(&format!("found {} speaker cards", speakers.len()));
        Ok(speakers)
    }

    fn extract_schedule(&self, document: &Html, timezone: Tz) -> Result<Vec<RawScheduleItem>> {
        let mut items = Vec::new();

        for panel in document.select(&self.panel) {
            let title = select_text(panel, &self.panel_title);

            let slot = match parse_schedule_text(&select_text(panel, &self.panel_muted), timezone) {
                Ok(slot) => slot,
                Err(e) => {
                    self.logger.warn(&format!("skipping {:?}: {}", title, e));
                    continue;
                }
            };

            let speaker = panel
                .select(&self.panel_heading)
                .last()
                .and_then(last_element_child)
                .map(element_text)
                .unwrap_or_default();

            let talk = if speaker.is_empty() {
                None
            } else {
                let description = panel
                    .select(&self.panel_body)
                    .last()
                    .and_then(last_element_child)
                    .map(element_text)
                    .unwrap_or_default();
                Some(RawTalk { speaker, description })
            };

            items.push(ScheduleItem {
                title,
                talk,
                starts: slot.starts,
                duration: slot.duration,
            });
        }

        self.logger.debug(&format!("found {} schedule rows", items.len()));
        Ok(items)
    }
}
