use super::{ResourceType, Row};
use crate::Result;
use crate::har::{Entry, Response};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Formats tried, in order, when a start time is not valid RFC 3339.
/// Offset-less timestamps are read as UTC.
const FALLBACK_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Turns raw capture entries into uniform rows.
pub struct EntryNormalizer;

impl EntryNormalizer {
    /// Normalize one raw entry, returning `None` when it is unusable.
    pub fn normalize(entry: &Value) -> Option<Row> {
        match Self::try_normalize(entry) {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Error processing entry: {}", e);
                None
            }
        }
    }

    /// Like [`normalize`](Self::normalize) but reports entries whose fields
    /// have the wrong shape instead of swallowing them.
    pub fn try_normalize(entry: &Value) -> Result<Option<Row>> {
        let entry = Entry::deserialize(entry)?;
        Ok(Self::from_entry(&entry))
    }

    /// Build a row from a typed entry. Entries without a url yield `None`.
    pub fn from_entry(entry: &Entry) -> Option<Row> {
        let url = entry
            .request
            .as_ref()
            .and_then(|r| r.url.as_deref())
            .filter(|url| !url.is_empty())?;

        let method = entry
            .request
            .as_ref()
            .and_then(|r| r.method.clone())
            .unwrap_or_else(|| "GET".to_string());

        let response = entry.response.as_ref();
        let mime_type = response
            .and_then(|r| r.content.as_ref())
            .and_then(|c| c.mime_type.clone())
            .unwrap_or_default();
        let status_code = response.and_then(|r| r.status).unwrap_or(0);
        let size_bytes = resolve_size(response);

        let start_time = entry.started_date_time.as_deref().and_then(|raw| {
            let parsed = parse_start_time(raw);
            if parsed.is_none() {
                tracing::warn!("Could not parse start time: {}", raw);
            }
            parsed
        });

        let timings = entry.timings.clone().unwrap_or_default();

        Some(Row {
            url: url.to_string(),
            method,
            status_code,
            resource_type: ResourceType::categorize(&mime_type, url),
            mime_type,
            response_time_ms: entry.time.unwrap_or(0.0),
            size_bytes,
            size_kb: size_bytes / 1024.0,
            start_time,
            timing_blocked: timings.blocked.unwrap_or(0.0),
            timing_dns: timings.dns.unwrap_or(0.0),
            timing_connect: timings.connect.unwrap_or(0.0),
            timing_send: timings.send.unwrap_or(0.0),
            timing_wait: timings.wait.unwrap_or(0.0),
            timing_receive: timings.receive.unwrap_or(0.0),
        })
    }
}

/// Pick the body size: `content.size` when present, then `bodySize`, then
/// `encodedBodySize`, each only when positive.
fn resolve_size(response: Option<&Response>) -> f64 {
    let Some(response) = response else {
        return 0.0;
    };

    if let Some(size) = response
        .content
        .as_ref()
        .and_then(|c| c.size)
        .filter(|size| *size >= 0.0)
    {
        return size;
    }

    [response.body_size, response.encoded_body_size]
        .into_iter()
        .flatten()
        .find(|size| *size > 0.0)
        .unwrap_or(0.0)
}

/// Parse a HAR `startedDateTime` value.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    FALLBACK_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
