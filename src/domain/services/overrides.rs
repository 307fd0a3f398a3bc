use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::models::event::Event;
use crate::domain::models::event_override::{EventOverride, OverridePatch, OVERRIDE_STATUS_CANCELLED};
use crate::domain::models::occurrence::Occurrence;
use crate::domain::models::venue::Venue;

/// Override lookup key: (event id, occurrence date key).
pub type OverrideKey = (String, NaiveDate);

pub type OverrideMap = HashMap<OverrideKey, OccurrenceOverride>;

/// One normalized override shape. The stored row's legacy flat columns and
/// its generic patch are folded here per field, patch winning, so the merge
/// step only ever sees a single representation.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceOverride {
    pub cancelled: bool,
    pub patch: OverridePatch,
}

impl OccurrenceOverride {
    /// An override with nothing in it is the same state as no override; rows
    /// like this are deleted at the write boundary rather than stored.
    pub fn is_empty(&self) -> bool {
        !self.cancelled && self.patch.is_empty()
    }
}

/// Fold a stored row into the normalized shape. An unreadable `patch_json`
/// degrades to the legacy columns instead of failing the row.
pub fn normalize_override(row: &EventOverride) -> OccurrenceOverride {
    let mut patch = match row.patch_json.as_deref() {
        Some(raw) => serde_json::from_str::<OverridePatch>(raw).unwrap_or_else(|e| {
            warn!(
                "Discarding unreadable override patch for event {} on {}: {}",
                row.event_id, row.date, e
            );
            OverridePatch::default()
        }),
        None => OverridePatch::default(),
    };

    if patch.start_time.is_none() {
        patch.start_time = row.override_start_time.clone();
    }
    if patch.cover_image_url.is_none() {
        patch.cover_image_url = row.override_cover_image_url.clone();
    }
    if patch.host_notes.is_none() {
        patch.host_notes = row.override_notes.clone();
    }

    OccurrenceOverride {
        cancelled: row.status == OVERRIDE_STATUS_CANCELLED,
        patch,
    }
}

/// Reshape a flat list of rows (pre-filtered to the events and window of
/// interest) into an O(1) lookup map. The store enforces uniqueness per
/// (event, date), so this performs no conflict resolution.
pub fn build_override_map(rows: &[EventOverride]) -> OverrideMap {
    rows.iter()
        .map(|row| ((row.event_id.clone(), row.date), normalize_override(row)))
        .collect()
}

/// Merge one event, one occurrence date and an optional override into the
/// concrete occurrence view. Field precedence is override > base; a
/// cancelled override still applies its other fields (a cancelled night may
/// carry an explanatory note). A patch `event_date` differing from the
/// occurrence's own key is a reschedule: the display date moves, the key
/// stays.
pub fn merge_occurrence(
    event: &Event,
    venue: Option<&Venue>,
    date: NaiveDate,
    ovr: Option<&OccurrenceOverride>,
) -> Occurrence {
    let base_venue_name = event
        .venue_name
        .clone()
        .or_else(|| venue.map(|v| v.name.clone()));
    let base_venue_address = event
        .venue_address
        .clone()
        .or_else(|| venue.map(|v| v.address.clone()));

    let (cancelled, patch) = match ovr {
        Some(o) => (o.cancelled, o.patch.clone()),
        None => (false, OverridePatch::default()),
    };

    let display_date = patch.event_date.unwrap_or(date);

    Occurrence {
        event_id: event.id.clone(),
        date,
        display_date,
        title: patch.title.unwrap_or_else(|| event.title.clone()),
        description: patch.description.unwrap_or_else(|| event.description.clone()),
        start_time: patch.start_time.or_else(|| event.start_time.clone()),
        end_time: patch.end_time.or_else(|| event.end_time.clone()),
        venue_name: patch.venue_name.or(base_venue_name),
        venue_address: patch.venue_address.or(base_venue_address),
        cover_image_url: patch.cover_image_url.or_else(|| event.cover_image_url.clone()),
        is_free: patch.is_free.unwrap_or(event.is_free),
        cost: patch.cost.or_else(|| event.cost.clone()),
        capacity: patch.capacity.or(event.capacity),
        signup_url: patch.signup_url.or_else(|| event.signup_url.clone()),
        host_notes: patch.host_notes.or_else(|| event.host_notes.clone()),
        cancelled,
        rescheduled: display_date != date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event_override::OVERRIDE_STATUS_NORMAL;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn base_event() -> Event {
        Event {
            id: "ev-1".to_string(),
            title: "Open Mic Night".to_string(),
            description: "Weekly mic".to_string(),
            venue_id: None,
            venue_name: Some("The Cellar".to_string()),
            venue_address: Some("12 Stage St".to_string()),
            event_date: None,
            day_of_week: Some("Tuesday".to_string()),
            recurrence_rule: None,
            start_time: Some("19:00".to_string()),
            end_time: Some("22:00".to_string()),
            is_published: true,
            status: "active".to_string(),
            cover_image_url: None,
            is_free: true,
            cost: None,
            capacity: Some(20),
            signup_url: None,
            host_notes: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn row(event_id: &str, date: NaiveDate) -> EventOverride {
        let mut r = EventOverride::new(event_id.to_string(), date);
        r.status = OVERRIDE_STATUS_NORMAL.to_string();
        r
    }

    #[test]
    fn test_patch_wins_over_legacy_per_field() {
        let mut r = row("ev-1", d(2026, 3, 10));
        r.patch_json = Some(r#"{"start_time":"20:00"}"#.to_string());
        r.override_start_time = Some("18:00".to_string());
        r.override_notes = Some("bring two songs".to_string());

        let normalized = normalize_override(&r);
        assert_eq!(normalized.patch.start_time.as_deref(), Some("20:00"));
        // A legacy field with no patch counterpart still comes through.
        assert_eq!(normalized.patch.host_notes.as_deref(), Some("bring two songs"));
    }

    #[test]
    fn test_unknown_patch_keys_are_dropped() {
        let mut r = row("ev-1", d(2026, 3, 10));
        r.patch_json = Some(r#"{"start_time":"20:00","admin_secret":"nope"}"#.to_string());
        let normalized = normalize_override(&r);
        assert_eq!(normalized.patch.start_time.as_deref(), Some("20:00"));
    }

    #[test]
    fn test_unreadable_patch_degrades_to_legacy() {
        let mut r = row("ev-1", d(2026, 3, 10));
        r.patch_json = Some("{not json".to_string());
        r.override_start_time = Some("18:30".to_string());
        let normalized = normalize_override(&r);
        assert_eq!(normalized.patch.start_time.as_deref(), Some("18:30"));
    }

    #[test]
    fn test_empty_override_detection() {
        let r = row("ev-1", d(2026, 3, 10));
        assert!(normalize_override(&r).is_empty());

        let mut cancelled = row("ev-1", d(2026, 3, 10));
        cancelled.status = OVERRIDE_STATUS_CANCELLED.to_string();
        assert!(!normalize_override(&cancelled).is_empty());
    }

    #[test]
    fn test_merge_override_precedence() {
        let event = base_event();
        let mut r = row("ev-1", d(2026, 3, 10));
        r.patch_json = Some(r#"{"start_time":"20:00"}"#.to_string());
        let normalized = normalize_override(&r);

        let patched = merge_occurrence(&event, None, d(2026, 3, 10), Some(&normalized));
        assert_eq!(patched.start_time.as_deref(), Some("20:00"));

        // Other occurrences of the series keep the base time.
        let plain = merge_occurrence(&event, None, d(2026, 3, 17), None);
        assert_eq!(plain.start_time.as_deref(), Some("19:00"));
    }

    #[test]
    fn test_cancellation_keeps_patch_fields() {
        let event = base_event();
        let mut r = row("ev-1", d(2026, 3, 10));
        r.status = OVERRIDE_STATUS_CANCELLED.to_string();
        r.patch_json = Some(r#"{"host_notes":"rescheduling soon"}"#.to_string());
        let normalized = normalize_override(&r);

        let occ = merge_occurrence(&event, None, d(2026, 3, 10), Some(&normalized));
        assert!(occ.cancelled);
        assert_eq!(occ.host_notes.as_deref(), Some("rescheduling soon"));
    }

    #[test]
    fn test_reschedule_moves_display_date_only() {
        let event = base_event();
        let mut r = row("ev-1", d(2026, 3, 10));
        r.patch_json = Some(r#"{"event_date":"2026-03-12"}"#.to_string());
        let normalized = normalize_override(&r);

        let occ = merge_occurrence(&event, None, d(2026, 3, 10), Some(&normalized));
        assert_eq!(occ.date, d(2026, 3, 10));
        assert_eq!(occ.display_date, d(2026, 3, 12));
        assert!(occ.rescheduled);
    }

    #[test]
    fn test_custom_location_wins_over_linked_venue() {
        let mut event = base_event();
        event.venue_name = None;
        event.venue_address = None;
        event.venue_id = Some("venue-1".to_string());
        let venue = Venue::new(
            "The Cellar".to_string(),
            "12 Stage St".to_string(),
            "Springfield".to_string(),
            None,
        );

        let plain = merge_occurrence(&event, Some(&venue), d(2026, 3, 10), None);
        assert_eq!(plain.venue_name.as_deref(), Some("The Cellar"));

        let mut r = row("ev-1", d(2026, 3, 10));
        r.patch_json = Some(r#"{"venue_name":"Backup Bar"}"#.to_string());
        let normalized = normalize_override(&r);
        let moved = merge_occurrence(&event, Some(&venue), d(2026, 3, 10), Some(&normalized));
        assert_eq!(moved.venue_name.as_deref(), Some("Backup Bar"));
    }

    #[test]
    fn test_build_override_map_keys() {
        let mut r1 = row("ev-1", d(2026, 3, 10));
        r1.patch_json = Some(r#"{"start_time":"20:00"}"#.to_string());
        let r2 = row("ev-2", d(2026, 3, 10));

        let map = build_override_map(&[r1, r2]);
        assert_eq!(map.len(), 2);
        assert!(map.contains_key(&("ev-1".to_string(), d(2026, 3, 10))));
        assert!(map.contains_key(&("ev-2".to_string(), d(2026, 3, 10))));
        assert!(!map.contains_key(&("ev-1".to_string(), d(2026, 3, 17))));
    }
}
