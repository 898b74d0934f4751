// Best-effort score extraction from free-text model replies.
//
// Models are told to answer with a bare number but occasionally wrap it
// ("85.", "85/100", "\n85"). The rule: skip leading whitespace, take the
// longest run of ASCII digits, no digits means 0. Signs are not digits, so
// "-5" is 0, which is where the clamp would put it anyway.

/// Parse the longest leading digit run after optional whitespace.
///
/// Returns 0 when there is no digit run. Saturates at `u64::MAX` instead of
/// overflowing.
pub fn parse_leading_int(text: &str) -> u64 {
    text.trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
        })
}

/// Clamp a parsed value into the 0..=100 score range.
pub fn clamp_score(value: u64) -> u8 {
    value.min(100) as u8
}

/// Parse and clamp a model reply in one step.
pub fn parse_score(reply: &str) -> u8 {
    clamp_score(parse_leading_int(reply))
}
