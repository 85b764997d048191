use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracecop_core::trace::types::{AccessMode, ExecutionRecord, ProcessId};

/// One entry of a JSON trace file.
///
/// A trace file is a JSON array of these objects:
///
/// ```json
/// [
///   {
///     "pid": 7,
///     "start": "2021-03-01T10:00:00",
///     "end": "2021-03-01T10:00:04.250000",
///     "resources": ["db/users", "cache"],
///     "mode": "w"
///   }
/// ]
/// ```
///
/// Timestamps are ISO-8601 local date-times without offset. Timestamps with
/// an RFC 3339 offset are accepted too and converted to UTC.
#[cfg_attr(feature = "schemars", derive(::schemars::JsonSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcessLog {
    /// Process identifier, stable across executions of the same process.
    pub pid: ProcessId,
    /// When the execution began.
    #[serde(with = "timestamp")]
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub start: NaiveDateTime,
    /// When the execution finished.
    #[serde(with = "timestamp")]
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub end: NaiveDateTime,
    /// Resources the execution touched, as declared by the producer.
    pub resources: Vec<String>,
    /// How every resource of this execution was accessed.
    pub mode: AccessMode,
}

impl From<ProcessLog> for ExecutionRecord<String, NaiveDateTime> {
    fn from(log: ProcessLog) -> Self {
        Self::new(log.pid, log.start, log.end, log.resources, log.mode)
    }
}

impl From<ExecutionRecord<String, NaiveDateTime>> for ProcessLog {
    fn from(record: ExecutionRecord<String, NaiveDateTime>) -> Self {
        Self {
            pid: record.process_id,
            start: record.start,
            end: record.end,
            resources: record.resources,
            mode: record.mode,
        }
    }
}

/// ISO-8601 timestamps as written and read by trace files.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, ParseError, Timelike};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    /// Seconds precision when the sub-second part is zero, microseconds
    /// otherwise.
    #[must_use]
    pub fn format(time: &NaiveDateTime) -> String {
        if time.nanosecond() == 0 {
            time.format("%Y-%m-%dT%H:%M:%S").to_string()
        } else {
            time.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        }
    }

    /// Parse a naive ISO-8601 date-time (`T` or space separated, optional
    /// fraction), or an RFC 3339 date-time normalised to UTC.
    ///
    /// # Errors
    ///
    /// Returns the RFC 3339 parse error when no accepted form matches.
    pub fn parse(text: &str) -> Result<NaiveDateTime, ParseError> {
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map_or_else(
                || DateTime::parse_from_rfc3339(text).map(|time| time.naive_utc()),
                Ok,
            )
    }

    /// Writes `time` in the form produced by [`format`].
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(time))
    }

    /// Reads any form accepted by [`parse`].
    ///
    /// # Errors
    ///
    /// Fails when the value is not a string or not a valid timestamp.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(|e| de::Error::custom(format_args!("invalid timestamp {text:?}: {e}")))
    }
}
