/// Default cap on the retained residual when no object boundary is found.
///
/// Bounds memory against a stream of brace-free line noise. Oldest data is
/// discarded, which is not a fatal condition for this link.
pub const DEFAULT_RESIDUAL_CAP: usize = 4000;

/// Extract complete, balanced, brace-delimited object substrings.
///
/// Returns the objects in the order their closing brace appears, plus the
/// unconsumed residual suffix:
/// - If the buffer ends mid-object, the residual is the span from the
///   unmatched opening brace to the end of the buffer. Nothing before it is
///   retained; any complete objects before it were already emitted.
/// - If no further `{` exists, the residual is the trailing tail after the
///   last consumed object, capped to `residual_cap` characters.
///
/// Characters inside double-quoted spans never affect brace depth, and a
/// backslash escapes exactly one following character (escape state does not
/// chain).
pub fn extract_objects(buffer: &str, residual_cap: usize) -> (Vec<String>, String) {
    // Braces, quotes and backslashes are ASCII; scanning bytes is safe in
    // UTF-8 because multi-byte sequences never contain ASCII values.
    let bytes = buffer.as_bytes();
    let mut objects = Vec::new();
    let mut search_from = 0usize;

    loop {
        let start = match buffer[search_from..].find('{') {
            Some(offset) => search_from + offset,
            None => {
                let residual = tail_chars(&buffer[search_from..], residual_cap);
                return (objects, residual);
            }
        };

        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end = None;

        for (j, &ch) in bytes.iter().enumerate().skip(start) {
            if in_string {
                if escaped {
                    escaped = false;
                } else if ch == b'\\' {
                    escaped = true;
                } else if ch == b'"' {
                    in_string = false;
                }
                continue;
            }
            match ch {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }

        match end {
            Some(j) => {
                objects.push(buffer[start..=j].to_string());
                search_from = j + 1;
            }
            // Unterminated object (or unterminated string inside one):
            // carry the partial span forward as the new buffer.
            None => return (objects, buffer[start..].to_string()),
        }
    }
}

/// Last `cap` characters of `text` (whole text if shorter).
fn tail_chars(text: &str, cap: usize) -> String {
    let count = text.chars().count();
    if count <= cap {
        return text.to_string();
    }
    let skip = count - cap;
    text.char_indices()
        .nth(skip)
        .map_or_else(String::new, |(idx, _)| text[idx..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(buffer: &str) -> (Vec<String>, String) {
        extract_objects(buffer, DEFAULT_RESIDUAL_CAP)
    }

    #[test]
    fn single_object_empty_residual() {
        let (objs, rest) = extract(r#"{"vbat":12.03,"soc":81.2}"#);
        assert_eq!(objs, vec![r#"{"vbat":12.03,"soc":81.2}"#.to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn concatenated_objects_in_order() {
        let (objs, rest) = extract(r#"{"a":1}{"b":2}"#);
        assert_eq!(objs, vec![r#"{"a":1}"#.to_string(), r#"{"b":2}"#.to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn partial_object_becomes_residual() {
        let (objs, rest) = extract(r#"{"a":1}{"b":"#);
        assert_eq!(objs, vec![r#"{"a":1}"#.to_string()]);
        assert_eq!(rest, r#"{"b":"#);
    }

    #[test]
    fn noise_before_object_is_skipped() {
        let (objs, rest) = extract("garbage\n\x00{\"a\":1}");
        assert_eq!(objs, vec![r#"{"a":1}"#.to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn open_brace_inside_string_does_not_open() {
        let (objs, rest) = extract(r#"{"a":"{"}"#);
        assert_eq!(objs, vec![r#"{"a":"{"}"#.to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn close_brace_inside_string_does_not_close() {
        let (objs, rest) = extract(r#"{"a":"}"}"#);
        assert_eq!(objs, vec![r#"{"a":"}"}"#.to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn escaped_quote_keeps_string_open() {
        let input = r#"{"a":"x\"}{\"y"}"#;
        let (objs, rest) = extract(input);
        assert_eq!(objs, vec![input.to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn escape_state_does_not_chain() {
        // The backslash escapes the second backslash; the quote then closes
        // the string normally.
        let input = r#"{"a":"\\"}"#;
        let (objs, rest) = extract(input);
        assert_eq!(objs, vec![input.to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn nested_objects_counted_once() {
        let input = r#"{"pins":{"en_charge":1,"en_relay":0},"soc":50.0}"#;
        let (objs, rest) = extract(input);
        assert_eq!(objs, vec![input.to_string()]);
        assert!(rest.is_empty());
    }

    #[test]
    fn unterminated_string_carried_forward() {
        let input = r#"{"stat":"charg"#;
        let (objs, rest) = extract(input);
        assert!(objs.is_empty());
        assert_eq!(rest, input);
    }

    #[test]
    fn brace_free_noise_capped_to_window() {
        let noise: String = "x".repeat(10_000);
        let (objs, rest) = extract(&noise);
        assert!(objs.is_empty());
        assert_eq!(rest.chars().count(), DEFAULT_RESIDUAL_CAP);
        assert_eq!(rest, "x".repeat(DEFAULT_RESIDUAL_CAP));
    }

    #[test]
    fn cap_respects_char_boundaries() {
        let noise: String = "é".repeat(6000);
        let (objs, rest) = extract_objects(&noise, 100);
        assert!(objs.is_empty());
        assert_eq!(rest.chars().count(), 100);
    }

    #[test]
    fn tail_after_last_object_is_retained() {
        let (objs, rest) = extract("{\"a\":1}\r\n");
        assert_eq!(objs.len(), 1);
        assert_eq!(rest, "\r\n");
    }

    #[test]
    fn partial_span_keeps_everything_from_its_open_brace() {
        let long_partial = format!("{{\"data\":\"{}\"", "y".repeat(8000));
        let input = format!("{{\"a\":1}}{long_partial}");
        let (objs, rest) = extract(&input);
        assert_eq!(objs, vec![r#"{"a":1}"#.to_string()]);
        // No cap applies once an opening brace has been found.
        assert_eq!(rest, long_partial);
    }

    #[test]
    fn empty_buffer() {
        let (objs, rest) = extract("");
        assert!(objs.is_empty());
        assert!(rest.is_empty());
    }
}
