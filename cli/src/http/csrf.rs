//! Cookie header parsing.

use percent_encoding::percent_decode_str;

/// Value of cookie `name` in a `Cookie` header (`a=1; b=2`).
///
/// Entries are split on `;` and trimmed, the first exact name match wins and
/// its value is percent-decoded the way browser code decodes `document.cookie`.
/// A value that does not decode to UTF-8 is returned as sent.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| decode(value))
}

fn decode(value: &str) -> String {
    percent_decode_str(value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_named_cookie() {
        let header = "sessionid=xyz; csrftoken=abc123; theme=dark";
        assert_eq!(cookie_value(header, "csrftoken"), Some("abc123".into()));
        assert_eq!(cookie_value(header, "sessionid"), Some("xyz".into()));
    }

    #[test]
    fn test_requires_exact_name() {
        assert_eq!(cookie_value("xcsrftoken=nope", "csrftoken"), None);
        assert_eq!(cookie_value("", "csrftoken"), None);
        assert_eq!(cookie_value("flag; csrftoken=", "csrftoken"), Some(String::new()));
    }

    #[test]
    fn test_percent_decodes_value() {
        assert_eq!(
            cookie_value("csrftoken=a%2Bb%3D%3D; theme=dark", "csrftoken"),
            Some("a+b==".into())
        );
        assert_eq!(cookie_value("csrftoken=%FF", "csrftoken"), Some("%FF".into()));
    }
}
