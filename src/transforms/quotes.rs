//! Repairs unescaped double quotes in otherwise-invalid CSV text.
//!
//! Some feeds ship rows like
//! `"RB 11","Fürth - Cadolzburg ( "Rangaubahn" )"` where the inner quotes
//! are not doubled, so the file cannot be parsed as CSV. This runs before
//! any parsing and works on the raw text.

/// Doubles every quote that sits between two ordinary characters.
///
/// A quote is left alone when the character before or after it is a comma,
/// another quote, a line boundary, or the start/end of the text; those
/// quotes delimit fields or are already escaped. The scan advances one
/// character at a time over the input, so two offending quotes sharing a
/// neighbor (`a"b"c`) are both escaped.
///
/// Returns the repaired text and the number of quotes escaped.
pub fn escape_double_quotes(text: &str) -> (String, usize) {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());
    let mut escaped = 0;

    for (i, &c) in chars.iter().enumerate() {
        if c == '"' {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            if !is_boundary(prev) && !is_boundary(next) {
                output.push_str("\"\"");
                escaped += 1;
                continue;
            }
        }
        output.push(c);
    }

    (output, escaped)
}

fn is_boundary(c: Option<char>) -> bool {
    matches!(c, None | Some(',') | Some('"') | Some('\n') | Some('\r'))
}
