//! UTF-16 message conversion.

/// Decodes a wide message, stopping at the first NUL.
///
/// Unpaired surrogates make the whole message invalid and yield an empty
/// string.
#[must_use]
pub fn from_wide(units: &[u16]) -> String {
    let end = units.iter().position(|&unit| unit == 0).unwrap_or(units.len());
    String::from_utf16(&units[..end]).unwrap_or_default()
}

/// Encodes `text` as UTF-16 without a terminator.
#[must_use]
pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_non_ascii() {
        let units = to_wide("journal 日誌 😀");
        assert_eq!(from_wide(&units), "journal 日誌 😀");
    }

    #[test]
    fn test_stops_at_nul() {
        let mut units = to_wide("visible");
        units.push(0);
        units.extend(to_wide("hidden"));

        assert_eq!(from_wide(&units), "visible");
    }

    #[test]
    fn test_invalid_input_is_empty() {
        assert_eq!(from_wide(&[0x0061, 0xD800, 0x0062]), "");
        assert_eq!(from_wide(&[]), "");
    }
}
