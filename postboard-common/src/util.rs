/// Serde helpers for [`UtcDateTime`] fields stored as RFC 3339 (ISO-8601) strings.
///
/// [`UtcDateTime`]: time::UtcDateTime
pub mod iso8601 {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};
    use time::{OffsetDateTime, UtcDateTime, format_description::well_known::Rfc3339};

    pub fn serialize<S>(value: &UtcDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = OffsetDateTime::from(*value)
            .format(&Rfc3339)
            .map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<UtcDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&raw, &Rfc3339)
            .map(UtcDateTime::from)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use time::{UtcDateTime, macros::utc_datetime};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "crate::util::iso8601")]
        at: UtcDateTime,
    }

    #[test]
    fn iso8601_strings() {
        let stamped = Stamped {
            at: utc_datetime!(2025-03-14 15:09:26),
        };
        let json = serde_json::to_string(&stamped).unwrap();
        assert_eq!(json, r#"{"at":"2025-03-14T15:09:26Z"}"#);
        assert_eq!(serde_json::from_str::<Stamped>(&json).unwrap(), stamped);

        let shifted: Stamped =
            serde_json::from_str(r#"{"at":"2025-03-14T17:09:26+02:00"}"#).unwrap();
        assert_eq!(shifted, stamped);

        assert!(serde_json::from_str::<Stamped>(r#"{"at":"yesterday"}"#).is_err());
    }
}
