use serde::de::DeserializeOwned;

/// Parse an enum value from a CLI argument using serde-deserialization.
///
/// Hyphens become underscores and the value is tried as given, then in
/// upper case, then in lower case, so `cold-storage` reaches `COLD_STORAGE`
/// and `Oldest-First` reaches `oldest_first`.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let candidates = [
        normalized.clone(),
        normalized.to_uppercase(),
        normalized.to_lowercase(),
    ];
    let mut last_error = None;
    for candidate in candidates {
        match serde_json::from_value(serde_json::Value::String(candidate)) {
            Ok(value) => return Ok(value),
            Err(error) => last_error = Some(error),
        }
    }
    match last_error {
        Some(error) => Err(anyhow::anyhow!("invalid {field} '{raw}': {error}")),
        None => Err(anyhow::anyhow!("invalid {field} '{raw}'")),
    }
}

/// Parse a JSON argument, naming the flag on failure.
pub fn parse_json(raw: &str, field: &str) -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|error| anyhow::anyhow!("invalid {field} JSON: {error}"))
}

#[cfg(test)]
mod tests {
    use ocd_core::enums::{AgentType, Feedback, ItemStatus};
    use ocd_reward::export::ExportOrder;

    use super::{parse_enum, parse_json};

    #[test]
    fn parses_lowercase_into_screaming_enum() {
        let agent: AgentType = parse_enum("filer", "agent").expect("agent should parse");
        assert_eq!(agent, AgentType::Filer);
        let feedback: Feedback = parse_enum("CONFIRMED", "feedback").expect("feedback should parse");
        assert_eq!(feedback, Feedback::Confirmed);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let status: ItemStatus =
            parse_enum("cold-storage", "status").expect("status should parse");
        assert_eq!(status, ItemStatus::ColdStorage);
        let order: ExportOrder = parse_enum("Oldest-First", "order").expect("order should parse");
        assert_eq!(order, ExportOrder::OldestFirst);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<ItemStatus>("finished", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'finished'"));
    }

    #[test]
    fn json_errors_name_the_flag() {
        let err = parse_json("{not json", "--state").expect_err("should fail");
        assert!(err.to_string().starts_with("invalid --state JSON"));
    }
}
