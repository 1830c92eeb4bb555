use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub hour: u8,
    pub load: f64,
    pub temperature: f64,
    pub weekend: bool,
    pub holiday: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub hour: u8,
    pub load: f64,
    pub temperature: f64,
    pub weekend: bool,
    pub holiday: bool,
    pub predicted_price: f64,
}

impl PredictionResult {
    /// True when the five input fields match what was submitted.
    pub fn echoes(&self, request: &PredictionRequest) -> bool {
        self.hour == request.hour
            && self.load == request.load
            && self.temperature == request.temperature
            && self.weekend == request.weekend
            && self.holiday == request.holiday
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: RecordId,
    pub hour: u8,
    pub load: f64,
    pub temperature: f64,
    pub weekend: bool,
    pub holiday: bool,
    pub predicted_price: f64,
    pub created_at: Timestamp,
}

/// Server-assigned record identifier. The backend emits numbers today but the
/// client only ever compares ids, so strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "RawRecordId")]
pub struct RecordId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecordId {
    Number(i64),
    Text(String),
}

impl From<RawRecordId> for RecordId {
    fn from(raw: RawRecordId) -> Self {
        match raw {
            RawRecordId::Number(n) => RecordId(n.to_string()),
            RawRecordId::Text(s) => RecordId(s),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTimestamp")]
pub enum Timestamp {
    /// Wall-clock time without an offset, as the backend's `LocalDateTime` emits it.
    Naive(NaiveDateTime),
    Utc(DateTime<Utc>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl TryFrom<RawTimestamp> for Timestamp {
    type Error = String;

    fn try_from(raw: RawTimestamp) -> Result<Self, Self::Error> {
        match raw {
            RawTimestamp::Millis(ms) => from_millis(ms),
            RawTimestamp::Text(s) => Timestamp::parse(&s),
        }
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl Timestamp {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let ms = s
                .parse::<i64>()
                .map_err(|e| format!("invalid epoch timestamp {s:?}: {e}"))?;
            return from_millis(ms);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp::Utc(dt.with_timezone(&Utc)));
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Timestamp::Naive(dt));
            }
        }

        // Date-only values mean midnight.
        if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(Timestamp::Naive(dt));
        }

        Err(format!("unrecognized timestamp: {s:?}"))
    }
}

fn from_millis(ms: i64) -> Result<Timestamp, String> {
    DateTime::from_timestamp_millis(ms)
        .map(Timestamp::Utc)
        .ok_or_else(|| format!("epoch timestamp out of range: {ms}"))
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Timestamp::Utc(dt) => write!(f, "{} UTC", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_decodes_numeric_id_and_local_datetime() {
        let v = json!({
            "id": 17,
            "hour": 8,
            "load": 12000.0,
            "temperature": -3.5,
            "weekend": true,
            "holiday": false,
            "predictedPrice": 55.125,
            "createdAt": "2026-01-27T14:05:09.123456"
        });

        let record: PredictionRecord = serde_json::from_value(v).unwrap();
        assert_eq!(record.id, RecordId("17".to_string()));
        assert_eq!(record.created_at.to_string(), "2026-01-27 14:05:09");
        assert_eq!(record.predicted_price, 55.125);
    }

    #[test]
    fn timestamp_accepts_offsets_and_epoch_millis() {
        let zoned = Timestamp::parse("2026-01-27T14:05:09+09:00").unwrap();
        assert_eq!(zoned.to_string(), "2026-01-27 05:05:09 UTC");

        let epoch: Timestamp = serde_json::from_value(json!(0)).unwrap();
        assert_eq!(epoch.to_string(), "1970-01-01 00:00:00 UTC");

        let epoch_text = Timestamp::parse("86400000").unwrap();
        assert_eq!(epoch_text.to_string(), "1970-01-02 00:00:00 UTC");
    }

    #[test]
    fn timestamp_accepts_minute_precision_and_date_only() {
        let minute = Timestamp::parse("2026-01-27T14:05").unwrap();
        assert_eq!(minute.to_string(), "2026-01-27 14:05:00");

        let spaced = Timestamp::parse("2026-01-27 14:05").unwrap();
        assert_eq!(spaced, minute);

        let date = Timestamp::parse("2026-01-27").unwrap();
        assert_eq!(date.to_string(), "2026-01-27 00:00:00");
    }

    #[test]
    fn listing_with_mixed_timestamp_precision_decodes() {
        let v = json!([
            {"id": 1, "hour": 14, "load": 9000.0, "temperature": 18.0, "weekend": false,
             "holiday": false, "predictedPrice": 31.0, "createdAt": "2026-01-27T14:05"},
            {"id": 2, "hour": 9, "load": 8000.0, "temperature": 16.0, "weekend": false,
             "holiday": true, "predictedPrice": 28.0, "createdAt": "2026-01-26T09:00:00.5"}
        ]);

        let records: Vec<PredictionRecord> = serde_json::from_value(v).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].created_at.to_string(), "2026-01-27 14:05:00");
        assert_eq!(records[1].created_at.to_string(), "2026-01-26 09:00:00");
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_err());
        let res = serde_json::from_value::<Timestamp>(json!("not a date"));
        assert!(res.is_err());
    }

    #[test]
    fn result_ignores_extra_backend_keys() {
        let v = json!({
            "id": 3,
            "hour": 12,
            "load": 15000.0,
            "temperature": 25.0,
            "weekend": false,
            "holiday": false,
            "predictedPrice": 42.5,
            "createdAt": "2026-01-27T14:05:09"
        });
        let result: PredictionResult = serde_json::from_value(v).unwrap();
        let request = PredictionRequest {
            hour: 12,
            load: 15000.0,
            temperature: 25.0,
            weekend: false,
            holiday: false,
        };
        assert!(result.echoes(&request));
        assert!(!result.echoes(&PredictionRequest { hour: 13, ..request }));
    }
}
