use std::collections::HashMap;

use crate::types::{RawScheduleItem, ScheduleItem, Speaker, Talk};

/// Resolve each row's speaker name against the speaker list.
///
/// Names match by exact string equality; if two cards share a name the
/// first one on the page wins. Rows keep their order, and rows without a
/// talk pass through untouched.
pub fn join_schedule(speakers: &[Speaker], items: &[RawScheduleItem]) -> Vec<ScheduleItem> {
    let mut by_name: HashMap<&str, &Speaker> = HashMap::with_capacity(speakers.len());
    for speaker in speakers {
        by_name.entry(speaker.name.as_str()).or_insert(speaker);
    }

    items
        .iter()
        .map(|item| ScheduleItem {
            title: item.title.clone(),
            talk: item.talk.as_ref().map(|talk| Talk {
                speaker: by_name.get(talk.speaker.as_str()).map(|s| (*s).clone()),
                description: talk.description.clone(),
            }),
            starts: item.starts,
            duration: item.duration,
        })
        .collect()
}
