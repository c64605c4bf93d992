//! Event listing for one month range.

use chrono::{Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use serde::Deserialize;

use super::{TadpolesArchiver, ensure_success};
use crate::error::{Error, Result};
use crate::types::{DateRange, EventAttachment};

/// Upper bound on events returned per listing request
///
/// The service caps each response; ranges are month-sized specifically to
/// stay under this cap in practice, so no pagination is attempted beyond it.
const EVENTS_PER_RANGE: u32 = 300;

/// Wire format of the event listing response
#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    event_date: String,
    #[serde(default)]
    new_attachments: Vec<RawAttachment>,
}

#[derive(Debug, Deserialize)]
struct RawAttachment {
    key: String,
    mime_type: String,
}

impl TadpolesArchiver {
    /// List one [`EventAttachment`] per media object for events in `[start, end)`
    ///
    /// Issues a single request; events without attachments contribute no
    /// records, events with several contribute one record per attachment,
    /// all sharing the event's date. Order follows the response: events in
    /// listing order, attachments in their declared order.
    pub async fn events_between(&self, range: &DateRange) -> Result<Vec<EventAttachment>> {
        let earliest = local_midnight_epoch(range.start)?;
        let latest = local_midnight_epoch(range.end)?;

        let response = self
            .http
            .get(self.events_url()?)
            .query(&[
                ("direction", "range".to_string()),
                ("earliest_event_time", earliest.to_string()),
                ("latest_event_time", latest.to_string()),
                ("num_events", EVENTS_PER_RANGE.to_string()),
                ("client", "dashboard".to_string()),
            ])
            .send()
            .await?;
        let response = ensure_success(response)?;
        let body = response.text().await?;
        let listing: EventsResponse = serde_json::from_str(&body)?;

        let mut attachments = Vec::new();
        for event in listing.events {
            let event_date = parse_event_date(&event.event_date)?;
            for attachment in event.new_attachments {
                attachments.push(EventAttachment {
                    event_date,
                    key: attachment.key,
                    mime_type: attachment.mime_type,
                });
            }
        }

        tracing::debug!(
            period = %range,
            attachments = attachments.len(),
            "listed events"
        );
        Ok(attachments)
    }
}

/// Parse the `YYYY-MM-DD` prefix of an event date string
///
/// The service sometimes appends a time component; only the date prefix is
/// meaningful for bucketing.
fn parse_event_date(raw: &str) -> Result<NaiveDate> {
    let prefix = raw
        .get(..10)
        .ok_or_else(|| Error::InvalidEvent(format!("event_date too short: {raw:?}")))?;
    prefix
        .parse::<NaiveDate>()
        .map_err(|e| Error::InvalidEvent(format!("bad event_date {raw:?}: {e}")))
}

/// Epoch seconds of local midnight on `date`
///
/// The service interprets range boundaries in the account's local time, so
/// the conversion deliberately uses the local offset rather than UTC. On the
/// rare DST transition where midnight is ambiguous, the earlier reading wins.
pub(crate) fn local_midnight_epoch(date: NaiveDate) -> Result<i64> {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(instant) => Ok(instant.timestamp()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp()),
        LocalResult::None => Err(Error::Other(format!(
            "local midnight does not exist on {date}"
        ))),
    }
}
