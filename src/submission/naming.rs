use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Blob names sort lexicographically by submission time:
/// `2026-08-22T12-34-56-789Z_<uuid>.json`. The RFC 3339 stamp swaps ':' and
/// '.' for '-' since neither is safe across blob tooling.
pub fn blob_name(at: DateTime<Utc>, id: Uuid) -> String {
    let stamp: String = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .collect();
    format!("{stamp}_{id}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn stamps_are_flattened_rfc3339() {
        let id = Uuid::parse_str("c1a9ae4f-0e43-4de3-bd23-b54bd7d67d3b").unwrap();
        assert_eq!(
            blob_name(at("2026-08-22T12:34:56.789Z"), id),
            "2026-08-22T12-34-56-789Z_c1a9ae4f-0e43-4de3-bd23-b54bd7d67d3b.json"
        );
    }

    #[test]
    fn milliseconds_are_always_three_digits() {
        let id = Uuid::new_v4();
        let name = blob_name(at("2026-01-02T03:04:05Z"), id);
        assert!(name.starts_with("2026-01-02T03-04-05-000Z_"), "{name}");
    }

    #[test]
    fn only_the_extension_dot_survives() {
        let name = blob_name(Utc::now(), Uuid::new_v4());
        assert!(!name.contains(':'));
        assert_eq!(name.matches('.').count(), 1);
        assert!(name.ends_with(".json"));
    }
}
