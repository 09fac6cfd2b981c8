//! Boolean flag literals as they are stored in the cache

/// Encode a flag the way the seeding client stores booleans
#[must_use]
pub const fn encode_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Decode a stored flag literal
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts. Returns `None` for anything else, including surrounding
/// whitespace.
#[must_use]
pub fn decode_flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_accepted_literals() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(decode_flag(raw), Some(true), "literal {raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(decode_flag(raw), Some(false), "literal {raw}");
        }
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for raw in ["", "yes", "tRUE", " true", "2", "nil"] {
            assert_eq!(decode_flag(raw), None, "literal {raw:?}");
        }
    }

    #[test]
    fn test_encoded_flags_decode() {
        assert_eq!(decode_flag(encode_flag(true)), Some(true));
        assert_eq!(decode_flag(encode_flag(false)), Some(false));
    }
}
