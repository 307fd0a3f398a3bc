use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::models::event::Event;
use crate::domain::models::occurrence::{GroupedListings, Series};
use crate::domain::models::venue::Venue;
use crate::domain::services::overrides::{merge_occurrence, OverrideMap};
use crate::domain::services::recurrence::{occurrences_in_window, Schedule};

/// Top-level aggregation behind the listing surfaces. Events arrive already
/// filtered by publication/status at the storage boundary; this engine does
/// not apply visibility rules. Per-event schedule failures are absorbed into
/// the unknown bucket so one bad row never blanks a page.
pub fn group_events(
    events: Vec<Event>,
    venues: &HashMap<String, Venue>,
    start: NaiveDate,
    end: NaiveDate,
    overrides: &OverrideMap,
) -> GroupedListings {
    let events = dedupe_events(events);

    let mut series = Vec::new();
    let mut unknown_events = Vec::new();

    for event in events {
        let schedule = match Schedule::for_event(&event) {
            Ok(schedule) => schedule,
            Err(err) => {
                warn!("Event {} has an uncomputable schedule: {}", event.id, err);
                unknown_events.push(event);
                continue;
            }
        };

        if schedule.is_unknown() {
            unknown_events.push(event);
            continue;
        }

        let dates = occurrences_in_window(&schedule, start, end);
        if dates.is_empty() {
            // Computable schedule, nothing in this window. Not unknown, not
            // an error; the event just doesn't appear.
            continue;
        }

        let venue = event.venue_id.as_ref().and_then(|id| venues.get(id));
        let occurrences = dates
            .iter()
            .map(|date| {
                let ovr = overrides.get(&(event.id.clone(), *date));
                merge_occurrence(&event, venue, *date, ovr)
            })
            .collect();

        series.push(Series {
            is_one_time: schedule.is_one_time(),
            occurrences,
            event,
        });
    }

    GroupedListings { series, unknown_events }
}

/// The upstream store can hold duplicate rows for what is conceptually one
/// listing. Keep the most complete record per normalized title; ties keep
/// the first encountered, and output order follows input order.
fn dedupe_events(events: Vec<Event>) -> Vec<Event> {
    let mut best_by_title: HashMap<String, (usize, u32)> = HashMap::new();
    let mut kept: Vec<Option<Event>> = Vec::with_capacity(events.len());

    for event in events {
        let key = normalized_title(&event.title);
        let score = completeness_score(&event);
        match best_by_title.get(&key).copied() {
            Some((slot, best_score)) if score > best_score => {
                best_by_title.insert(key, (slot, score));
                kept[slot] = Some(event);
            }
            Some(_) => {}
            None => {
                best_by_title.insert(key, (kept.len(), score));
                kept.push(Some(event));
            }
        }
    }

    kept.into_iter().flatten().collect()
}

fn normalized_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn completeness_score(event: &Event) -> u32 {
    let mut score = 0;
    if event.recurrence_rule.as_deref().is_some_and(|r| !r.trim().is_empty()) {
        score += 2;
    }
    if event.start_time.as_deref().is_some_and(|t| !t.trim().is_empty()) {
        score += 1;
    }
    score
}
