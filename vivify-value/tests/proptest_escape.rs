// vivify-value - Property tests for the escape codec
// Copyright (c) 2025 Tom Waddington. MIT licensed.

use proptest::prelude::*;
use vivify_value::{escape_string, unescape_string};

// Strings biased toward the ten handled code points, so the interesting
// branches are actually exercised.
fn interesting_string() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        Just("\"".to_string()),
        Just("\\".to_string()),
        Just("\n".to_string()),
        Just("\r".to_string()),
        Just("\u{8}".to_string()),
        Just("\t".to_string()),
        Just("\u{c}".to_string()),
        Just("<".to_string()),
        Just("\u{2028}".to_string()),
        Just("\u{2029}".to_string()),
        any::<char>().prop_map(|c| c.to_string()),
    ];
    proptest::collection::vec(fragment, 0..32).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn escape_round_trips(s in interesting_string()) {
        let escaped = escape_string(&s);
        prop_assert_eq!(unescape_string(&escaped).unwrap(), s);
    }

    #[test]
    fn arbitrary_strings_round_trip(s in any::<String>()) {
        let escaped = escape_string(&s);
        prop_assert_eq!(unescape_string(&escaped).unwrap(), s);
    }

    #[test]
    fn escaped_output_is_embeddable(s in interesting_string()) {
        let escaped = escape_string(&s);
        // None of the characters that terminate or corrupt a quoted
        // literal may survive unescaped.
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));
        let has_line_separator = escaped.contains('\u{2028}');
        prop_assert!(!has_line_separator);
        let has_paragraph_separator = escaped.contains('\u{2029}');
        prop_assert!(!has_paragraph_separator);
        // Every quote is escaped: strip the two-byte sequences first.
        let stripped = escaped.replace("\\\\", "").replace("\\\"", "");
        prop_assert!(!stripped.contains('"'));
    }

    #[test]
    fn escaping_is_idempotent_on_clean_text(s in "[a-zA-Z0-9 ]*") {
        prop_assert_eq!(escape_string(&s), s);
    }
}
