//! Preview panels: decoding clicks on `preview://` links and laying out the
//! decoded record for display.
//!
//! Layout is a pure function from [`PreviewPayload`] to [`Panel`]; turning a
//! panel into terminal text is the display module's job.

use lg_protocol::{decode_preview_link, PreviewKind, PreviewPayload};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::dates::{format_date, format_value_if_date, value_to_string};
use crate::images::image_for;

const SCHEDULE_KEYWORDS: [&str; 4] = ["schedule", "itinerary", "activities", "days"];
const MONEY_KEYWORDS: [&str; 3] = ["cost", "price", "budget"];
const MISSING: &str = "n/a";

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub image: Option<&'static str>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Row { label: String, value: String },
    Divider(String),
    Tags { label: String, items: Vec<String> },
    Schedule { title: String, groups: Vec<ScheduleGroup> },
    /// Pretty-printed JSON for records without a dedicated layout.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleGroup {
    pub heading: Option<String>,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleEntry {
    Details {
        heading: Option<String>,
        fields: Vec<(String, String)>,
    },
    Text(String),
}

/// Decode a clicked link and hand the record to `on_open`.
///
/// Returns false, after logging, when the link does not decode; `on_open`
/// is not called in that case.
pub fn handle_preview_click<F>(href: &str, on_open: F) -> bool
where
    F: FnOnce(Value, PreviewKind),
{
    match decode_preview_link(href) {
        Ok(payload) => {
            debug!(kind = %payload.kind, "opening preview");
            on_open(payload.data, payload.kind);
            true
        }
        Err(e) => {
            warn!(error = %e, href, "ignoring undecodable preview link");
            false
        }
    }
}

/// The detail panel's open/closed state.
#[derive(Debug, Default)]
pub struct PreviewPanel {
    open: Option<PreviewPayload>,
}

impl PreviewPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the panel for a link. A bad link leaves the panel as it was.
    pub fn open_link(&mut self, href: &str) -> bool {
        let open = &mut self.open;
        handle_preview_click(href, |data, kind| {
            *open = Some(PreviewPayload { kind, data });
        })
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn current(&self) -> Option<&PreviewPayload> {
        self.open.as_ref()
    }

    pub fn panel(&self) -> Option<Panel> {
        self.open.as_ref().map(build_panel)
    }
}

/// Lay out a record according to its kind.
pub fn build_panel(payload: &PreviewPayload) -> Panel {
    let data = &payload.data;
    let image = image_for(&payload.kind, data);
    let (title, blocks) = match &payload.kind {
        PreviewKind::Flight => ("Flight Details".to_string(), flight_blocks(data)),
        PreviewKind::Accommodation => (
            title_or(data, "Accommodation Details"),
            accommodation_blocks(data),
        ),
        PreviewKind::Attraction => (title_or(data, "Attraction Details"), generic_blocks(data)),
        PreviewKind::Restaurant => (title_or(data, "Restaurant Details"), generic_blocks(data)),
        PreviewKind::Itinerary => ("Itinerary Details".to_string(), itinerary_blocks(data)),
        PreviewKind::Budget => ("Budget Details".to_string(), budget_blocks(data)),
        PreviewKind::Unknown(_) => ("Details".to_string(), vec![raw(data)]),
    };
    Panel {
        title,
        image,
        blocks,
    }
}

/// `snake_case` key as a label.
pub fn label(key: &str) -> String {
    key.replace('_', " ")
}

fn row(label: impl Into<String>, value: impl Into<String>) -> Block {
    Block::Row {
        label: label.into(),
        value: value.into(),
    }
}

fn raw(data: &Value) -> Block {
    Block::Raw(serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()))
}

fn field(data: &Value, key: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(value) => value_to_string(value),
    }
}

/// A field that exists and is truthy in the JavaScript sense.
fn present<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    })
}

fn title_or(data: &Value, fallback: &str) -> String {
    present(data, "name")
        .map(value_to_string)
        .unwrap_or_else(|| fallback.to_string())
}

fn date_field(data: &Value, key: &str) -> String {
    data[key]
        .as_str()
        .map(format_date)
        .unwrap_or_else(|| field(data, key))
}

fn entries(data: &Value) -> impl Iterator<Item = (&String, &Value)> {
    data.as_object().into_iter().flat_map(Map::iter)
}

fn flight_blocks(data: &Value) -> Vec<Block> {
    let kind = if data["direct"].as_bool().unwrap_or(false) {
        "✓ Direct".to_string()
    } else {
        format!("{} stop(s)", field(data, "stops"))
    };

    let mut blocks = vec![
        row("Flight Number", field(data, "flight_number")),
        row("Airline", field(data, "airline")),
        row(
            "Route",
            format!("{} → {}", field(data, "origin"), field(data, "destination")),
        ),
        row(
            "Departure",
            format!(
                "{} at {}",
                date_field(data, "departure_date"),
                field(data, "departure_time")
            ),
        ),
        row("Arrival", field(data, "arrival_time")),
        row("Duration", field(data, "duration")),
        row("Price", format!("${}", field(data, "price"))),
        row("Type", kind),
        row("Seats Available", field(data, "seats_available")),
    ];

    if present(data, "return_date").is_some() {
        blocks.push(Block::Divider("Return Flight".to_string()));
        blocks.push(row("Return Date", date_field(data, "return_date")));
        blocks.push(row("Departure", field(data, "return_departure_time")));
        blocks.push(row("Arrival", field(data, "return_arrival_time")));
    }
    blocks
}

fn accommodation_blocks(data: &Value) -> Vec<Block> {
    let mut blocks = Vec::new();
    let optional = |key: &str| present(data, key).map(value_to_string);

    if let Some(id) = optional("id") {
        blocks.push(row("ID", id));
    }
    if let Some(kind) = optional("type") {
        blocks.push(row("Type", kind));
    }
    if let Some(location) = optional("destination") {
        blocks.push(row("Location", location));
    }
    if let Some(price) = optional("price_per_night") {
        blocks.push(row("Price per Night", format!("${price}")));
    }
    if let Some(rating) = optional("rating") {
        let value = match optional("reviews_count") {
            Some(count) => format!("⭐ {rating} ({count} reviews)"),
            None => format!("⭐ {rating}"),
        };
        blocks.push(row("Rating", value));
    }
    if let Some(distance) = optional("distance_to_center") {
        blocks.push(row("Distance to Center", distance));
    }
    if present(data, "check_in").is_some() {
        blocks.push(row("Check-in", date_field(data, "check_in")));
    }
    if present(data, "check_out").is_some() {
        blocks.push(row("Check-out", date_field(data, "check_out")));
    }
    if let Some(rooms) = optional("available_rooms") {
        blocks.push(row("Available Rooms", rooms));
    }
    if let Some(amenities) = data["amenities"].as_array().filter(|a| !a.is_empty()) {
        blocks.push(Block::Tags {
            label: "Amenities".to_string(),
            items: amenities.iter().map(value_to_string).collect(),
        });
    }
    blocks
}

/// Every field except the title and image, with date formatting.
fn generic_blocks(data: &Value) -> Vec<Block> {
    entries(data)
        .filter(|(key, _)| key.as_str() != "name" && key.as_str() != "image_url")
        .map(|(key, value)| row(label(key), format_value_if_date(key, value)))
        .collect()
}

fn budget_blocks(data: &Value) -> Vec<Block> {
    entries(data)
        .map(|(key, value)| {
            let is_money = MONEY_KEYWORDS.iter().any(|k| key.contains(k));
            let text = match value {
                Value::Number(n) if is_money => format!("${n}"),
                _ => format_value_if_date(key, value),
            };
            row(label(key), text)
        })
        .collect()
}

fn is_schedule_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SCHEDULE_KEYWORDS.iter().any(|k| key.contains(k))
}

fn itinerary_blocks(data: &Value) -> Vec<Block> {
    entries(data)
        .map(|(key, value)| match value {
            Value::Array(_) | Value::Object(_) => schedule_block(label(key), value),
            _ if is_schedule_key(key) => row(label(key), value_to_string(value)),
            _ => row(label(key), format_value_if_date(key, value)),
        })
        .collect()
}

fn schedule_block(title: String, value: &Value) -> Block {
    match value {
        Value::Array(items) => Block::Schedule {
            title,
            groups: vec![ScheduleGroup {
                heading: None,
                entries: items.iter().enumerate().map(timed_entry).collect(),
            }],
        },
        Value::Object(days) => Block::Schedule {
            title,
            groups: days
                .iter()
                .map(|(day, activities)| ScheduleGroup {
                    heading: Some(label(day)),
                    entries: day_entries(activities),
                })
                .collect(),
        },
        other => row(title, value_to_string(other)),
    }
}

/// One item of a flat schedule, headed by its `time` or its position.
fn timed_entry((index, item): (usize, &Value)) -> ScheduleEntry {
    match item.as_object() {
        Some(map) => ScheduleEntry::Details {
            heading: Some(
                present(item, "time")
                    .map(value_to_string)
                    .unwrap_or_else(|| format!("Item {}", index + 1)),
            ),
            fields: map
                .iter()
                .filter(|(k, _)| k.as_str() != "time")
                .map(|(k, v)| (label(k), format_value_if_date(k, v)))
                .collect(),
        },
        None => ScheduleEntry::Text(value_to_string(item)),
    }
}

fn day_entries(activities: &Value) -> Vec<ScheduleEntry> {
    match activities {
        Value::Array(items) => items
            .iter()
            .map(|activity| match activity.as_object() {
                Some(map) => ScheduleEntry::Details {
                    heading: None,
                    fields: map
                        .iter()
                        .map(|(k, v)| (label(k), format_value_if_date(k, v)))
                        .collect(),
                },
                None => ScheduleEntry::Text(value_to_string(activity)),
            })
            .collect(),
        other => vec![ScheduleEntry::Text(value_to_string(other))],
    }
}
