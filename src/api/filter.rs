use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::api::str_int;

/// Typed builder for the filter expression accepted by list calls.
///
/// All predicates must hold for an item to be returned. The rendered form is
/// the JSON the server expects in the `filter` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filter {
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub op: Op,
    pub key: String,
    #[serde(flatten)]
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Op {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
    In,
    IsSubstring,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    StringValue(String),
    IntValue(i32),
    LongValue(#[serde(with = "str_int")] i64),
    TimestampValue(DateTime<Utc>),
    StringValues(StringValues),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringValues {
    pub values: Vec<String>,
}

impl Filter {
    pub fn new() -> Self {
        Filter::default()
    }

    pub fn predicate(mut self, op: Op, key: impl Into<String>, value: Value) -> Self {
        self.predicates.push(Predicate {
            op,
            key: key.into(),
            value,
        });
        self
    }

    pub fn equals(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicate(Op::Equals, key, Value::StringValue(value.into()))
    }

    pub fn not_equals(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicate(Op::NotEquals, key, Value::StringValue(value.into()))
    }

    pub fn contains(self, key: impl Into<String>, substring: impl Into<String>) -> Self {
        self.predicate(Op::IsSubstring, key, Value::StringValue(substring.into()))
    }

    pub fn one_of<I, S>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.predicate(Op::In, key, Value::StringValues(StringValues { values }))
    }

    pub fn created_after(self, time: DateTime<Utc>) -> Self {
        self.predicate(Op::GreaterThan, "created_at", Value::TimestampValue(time))
    }

    pub fn created_before(self, time: DateTime<Utc>) -> Self {
        self.predicate(Op::LessThan, "created_at", Value::TimestampValue(time))
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn render_name_filter() {
        let filter = Filter::new().equals("name", "exp-1");
        assert_eq!(
            filter.to_string(),
            r#"{"predicates":[{"op":"EQUALS","key":"name","string_value":"exp-1"}]}"#
        );
    }

    #[test]
    fn render_mixed_predicates() {
        let since = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let filter = Filter::new()
            .one_of("name", vec!["a", "b"])
            .created_after(since)
            .predicate(Op::LessThanEquals, "size", Value::LongValue(10));
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            json!({
                "predicates": [
                    { "op": "IN", "key": "name", "string_values": { "values": ["a", "b"] } },
                    { "op": "GREATER_THAN", "key": "created_at", "timestamp_value": "2021-01-01T00:00:00Z" },
                    { "op": "LESS_THAN_EQUALS", "key": "size", "long_value": "10" }
                ]
            })
        );
    }
}
