// Permalink decoding: recover (channel, ts) from a message permalink.
//
// Slack permalinks look like
//   https://acme.slack.com/archives/C0123ABCD/p1690000000123456
// where the `p` token is the message `ts` with its decimal point removed.
// chat.delete wants the ts back in "seconds.micros" form.

use regex_lite::Regex;

/// Digits after the decimal point in a Slack `ts`.
const TS_FRACTION_DIGITS: usize = 6;

/// Channel id and message timestamp extracted from a permalink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPermalink {
    pub channel_id: String,
    /// Slack `ts` form, e.g. "1690000000.123456"
    pub ts: String,
}

fn permalink_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"/archives/([A-Za-z0-9]+)/p([0-9]{7,})").expect("valid regex")
    })
}

/// Decode a permalink. Returns `None` unless both the channel segment and
/// the `p<digits>` token are present.
pub fn decode(permalink: &str) -> Option<DecodedPermalink> {
    let caps = permalink_re().captures(permalink)?;
    let channel_id = caps.get(1)?.as_str();
    let digits = caps.get(2)?.as_str();

    let split = digits.len() - TS_FRACTION_DIGITS;
    Some(DecodedPermalink {
        channel_id: channel_id.to_string(),
        ts: format!("{}.{}", &digits[..split], &digits[split..]),
    })
}
