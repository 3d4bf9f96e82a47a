//! Normalization of raw `/camera/all` records into [`Camera`] values.
//!
//! Only `id`, `config.name`, `status.model` and `status.lastUpdate` are
//! required. Every other field is telemetry: absent keys, `null`s and
//! unexpected shapes all collapse to `None` instead of failing the record.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ParseError;
use crate::notification::Notification;
use crate::types::{Camera, Coordinates, Subscription};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Parses a camera listing, keeping order. One bad record fails the batch.
pub fn parse_cameras(records: &[Value]) -> Result<Vec<Camera>, ParseError> {
    let offset = local_offset();
    let cameras = records
        .iter()
        .map(|record| parse_camera_with_offset(record, offset))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = cameras.len(), "Parsed camera listing");
    Ok(cameras)
}

/// Parses one record, stamping `last_update_time` with the current local offset.
pub fn parse_camera(record: &Value) -> Result<Camera, ParseError> {
    parse_camera_with_offset(record, local_offset())
}

/// Same as [`parse_camera`] with an explicit offset for `last_update_time`.
pub fn parse_camera_with_offset(record: &Value, offset: FixedOffset) -> Result<Camera, ParseError> {
    let empty = Value::Object(Map::new());
    let config = field(record, "config").unwrap_or(&empty);
    let status = field(record, "status").unwrap_or(&empty);

    Ok(Camera {
        id: required_str(record, "id", "id")?,
        name: required_str(config, "name", "config.name")?,
        model: required_str(status, "model", "status.model")?,
        modem_firmware: optional_str(status, "modemFirmware").unwrap_or_default(),
        camera_firmware: optional_str(status, "version").unwrap_or_default(),
        last_update_time: last_update_time(status, offset)?,
        signal: path(status, &["signal", "processed", "percentage"])
            .and_then(Value::as_u64)
            .filter(|percentage| *percentage <= 100)
            .and_then(|percentage| u8::try_from(percentage).ok()),
        temperature: temperature(field(status, "temperature")),
        battery: battery(field(status, "batteries")),
        battery_type: optional_str(status, "batteryType"),
        memory: memory(field(status, "memory")),
        notifications: notifications(field(status, "notifications")),
        owner: owner(record),
        coordinates: coordinates(field(status, "coordinates")),
    })
}

/// Reads the caller's subscription counters from the first list entry.
pub fn parse_subscription(subscriptions: &[Value]) -> Subscription {
    let subscription = subscriptions.first();
    let counter = |key: &str| {
        subscription
            .and_then(|subscription| field(subscription, key))
            .and_then(Value::as_i64)
    };

    Subscription {
        photo_count: counter("photoCount"),
        photo_limit: counter("photoLimit"),
        hd_photo_count: counter("hdPhotoCount"),
        hd_photo_limit: counter("hdPhotoLimit"),
    }
}

fn local_offset() -> FixedOffset {
    *Local::now().offset()
}

/// Object lookup where JSON `null` counts as absent.
fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn path<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| field(current, key))
}

fn required_str(value: &Value, key: &str, name: &'static str) -> Result<String, ParseError> {
    match field(value, key).ok_or(ParseError::MissingField(name))? {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(ParseError::Format {
            field: name,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn optional_str(value: &Value, key: &str) -> Option<String> {
    field(value, key).and_then(Value::as_str).map(str::to_owned)
}

// The trailing zone designator is dropped and the observer's offset attached
// in its place, so "02:03:48Z" becomes 02:03:48 local time.
fn last_update_time(status: &Value, offset: FixedOffset) -> Result<DateTime<FixedOffset>, ParseError> {
    let raw = required_str(status, "lastUpdate", "status.lastUpdate")?;
    let trimmed = match raw.char_indices().next_back() {
        Some((index, _)) => &raw[..index],
        None => raw.as_str(),
    };

    let naive = parse_naive_timestamp(trimmed).ok_or_else(|| ParseError::Format {
        field: "status.lastUpdate",
        reason: format!("not an ISO-8601 timestamp: {:?}", raw),
    })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ParseError::Format {
            field: "status.lastUpdate",
            reason: format!("out of range for offset {}: {:?}", offset, raw),
        })
}

/// ISO-8601 date, optionally followed by `T` or a space and a time given to
/// the hour, minute, second or fraction (`.` or `,` separator).
fn parse_naive_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.replace(',', ".");
    if let Ok(date) = NaiveDate::parse_from_str(&text, DATE_FORMAT) {
        return date.and_hms_opt(0, 0, 0);
    }

    let (date, time) = text.split_once(|c| c == 'T' || c == ' ')?;
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time, format).ok())
        .or_else(|| {
            if time.len() != 2 || !time.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            NaiveTime::from_hms_opt(time.parse().ok()?, 0, 0)
        })?;
    Some(date.and_time(time))
}

fn temperature(temperature: Option<&Value>) -> Option<i64> {
    let temperature = temperature?;
    let unit = field(temperature, "unit")?;
    let value = field(temperature, "value")?;

    if unit.as_str() == Some("C") {
        return value.as_i64().or_else(|| value.as_f64().map(|celsius| celsius.trunc() as i64));
    }

    let fahrenheit = value.as_f64()?;
    Some(((fahrenheit - 32.0) * 5.0 / 9.0).trunc() as i64)
}

fn battery(batteries: Option<&Value>) -> Option<i64> {
    let cells: Box<dyn Iterator<Item = &Value> + '_> = match batteries? {
        Value::Array(cells) => Box::new(cells.iter()),
        Value::Object(cells) => Box::new(cells.values()),
        _ => return None,
    };

    cells
        .filter_map(|cell| cell.as_i64().or_else(|| cell.as_f64().map(|level| level.trunc() as i64)))
        .max()
}

fn memory(memory: Option<&Value>) -> Option<f64> {
    let memory = memory?.as_object()?;
    let used = memory.get("used").and_then(Value::as_f64).unwrap_or(0.0);
    let size = memory.get("size").and_then(Value::as_f64).unwrap_or(0.0);

    if size == 0.0 {
        return None;
    }
    // Exact halves go to the even neighbour: 1/32 is 3.12, not 3.13.
    Some((used / size * 100.0 * 100.0).round_ties_even() / 100.0)
}

fn notifications(notifications: Option<&Value>) -> Option<Vec<String>> {
    let notifications = notifications?.as_array()?;
    Some(
        notifications
            .iter()
            .map(|entry| Notification::from(entry).to_string())
            .collect(),
    )
}

fn owner(record: &Value) -> Option<String> {
    optional_str(record, "ownerFirstName").map(|owner| owner.trim().to_owned())
}

fn coordinates(coordinates: Option<&Value>) -> Option<Coordinates> {
    let entry = match coordinates?.as_array()?.as_slice() {
        [entry] => entry,
        _ => return None,
    };
    let position = field(entry, "position")?;
    if field(position, "type")?.as_str() != Some("Point") {
        return None;
    }

    match field(position, "coordinates")?.as_array()?.as_slice() {
        [longitude, latitude] => Some(Coordinates {
            latitude: latitude.as_f64()?,
            longitude: longitude.as_f64()?,
        }),
        _ => None,
    }
}
