use canonical_json::to_string;
use serde_json::Value;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// A non-integer number was found; ledger values are integral.
    #[error("non-integer number detected at {0}")]
    NonIntegerNumber(String),
    /// The RFC 8785 encoder rejected the value.
    #[error("canonical encoding failed: {0}")]
    Encoding(String),
}

/// Produces RFC 8785 canonical UTF-8 bytes for `value`.
///
/// Floating point numbers are rejected: every quantity on the ledger is an
/// unsigned integer and a float here means the caller built the value wrong.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    reject_floats(value, &mut Vec::new())?;
    let canonical = to_string(value).map_err(|e| CanonicalizationError::Encoding(e.to_string()))?;
    Ok(canonical.into_bytes())
}

fn reject_floats(value: &Value, path: &mut Vec<String>) -> Result<(), CanonicalizationError> {
    match value {
        Value::Number(n) if n.is_f64() => {
            let at = if path.is_empty() {
                "root".to_string()
            } else {
                path.join(".")
            };
            Err(CanonicalizationError::NonIntegerNumber(at))
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(format!("[{}]", i));
                reject_floats(item, path)?;
                path.pop();
            }
            Ok(())
        }
        Value::Object(map) => {
            for (key, item) in map {
                path.push(key.clone());
                reject_floats(item, path)?;
                path.pop();
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_object_keys() {
        let bytes = canonical_bytes(&json!({"b": 1, "a": "x"})).unwrap();
        assert_eq!(bytes, br#"{"a":"x","b":1}"#.to_vec());
    }

    #[test]
    fn rejects_float_with_path() {
        let err = canonical_bytes(&json!({"op": {"amount": 1.5}})).unwrap_err();
        match err {
            CanonicalizationError::NonIntegerNumber(at) => assert_eq!(at, "op.amount"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
