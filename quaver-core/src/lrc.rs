use crate::time::{duration_from_centis, DurationExt};
use std::time::Duration;

/// Credit-line prefixes: lyricist, composer, arranger, producer, mixing,
/// recording, distribution. Lines starting with one of these are credits,
/// not sung lyrics, and are dropped by the parser.
const CREDIT_PREFIXES: [&str; 7] = ["作词", "作曲", "编曲", "制作人", "混音", "录音", "发行"];

/// A single line of lyrics with its start time.
///
/// `time` is on a whole-centisecond grid, matching the two meaningful
/// fraction digits of an LRC tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLine {
    pub time: Duration,
    pub text: String,
}

/// Parsed lyrics: a time-ascending sequence of lines.
///
/// Owned by whoever holds the parse result for the current track and
/// discarded on track change; lookups never mutate it.
#[derive(Debug, Clone, Default)]
pub struct Lyrics {
    pub lines: Vec<LyricLine>,
}

impl Lyrics {
    /// Parse LRC-style lyric text.
    ///
    /// Each input line may carry any number of `[mm:ss.f]`/`[mm:ss.ff]`/
    /// `[mm:ss.fff]` tags, anywhere in the line; all tags share the line's
    /// tag-stripped text, one output entry per tag. Lines without a valid
    /// tag, lines whose stripped text is empty, and credit lines are
    /// silently dropped. Malformed input is never an error, it just yields
    /// fewer lines. The result is sorted ascending by time; the relative
    /// order of equal-time entries is unspecified.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut lines = Vec::new();

        for raw in input.lines() {
            parse_line(raw, &mut lines);
        }

        lines.sort_by_key(|l| l.time);

        Self { lines }
    }

    /// Find the index of the line active at `position`.
    ///
    /// Returns the greatest index whose time is `<= position`. When
    /// `position` precedes every line, this is `Some(0)`: the first line is
    /// shown early rather than nothing ("snap to first line"). `None` means
    /// the line list is empty, and only that.
    ///
    /// `position` is snapped to the centisecond grid before comparison so
    /// float drift from a media clock cannot flicker the result across a
    /// line boundary. Binary search; called on every playback tick.
    #[must_use]
    pub fn current_line_index(&self, position: Duration) -> Option<usize> {
        if self.lines.is_empty() {
            return None;
        }

        let position = position.round_to_centis();

        let mut left = 0;
        let mut right = self.lines.len();
        let mut result = 0;

        while left < right {
            let mid = left + (right - left) / 2;
            if self.lines[mid].time <= position {
                result = mid;
                left = mid + 1;
            } else {
                right = mid;
            }
        }

        Some(result)
    }

    /// The line active at `position`, if any.
    #[must_use]
    pub fn current_line(&self, position: Duration) -> Option<&LyricLine> {
        self.current_line_index(position)
            .and_then(|i| self.lines.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Parse one raw input line, appending an entry per valid tag.
fn parse_line(raw: &str, out: &mut Vec<LyricLine>) {
    let mut times = Vec::new();
    let mut text = String::new();
    let mut rest = raw;

    while let Some(open) = rest.find('[') {
        text.push_str(&rest[..open]);
        rest = &rest[open..];
        if let Some((consumed, time)) = parse_tag(rest) {
            times.push(time);
            rest = &rest[consumed..];
        } else {
            // a '[' that does not open a timestamp tag is ordinary text
            text.push('[');
            rest = &rest[1..];
        }
    }
    text.push_str(rest);

    if times.is_empty() {
        return;
    }

    let text = text.trim();
    if text.is_empty() || is_credit_line(text) {
        return;
    }

    for time in times {
        out.push(LyricLine {
            time,
            text: text.to_string(),
        });
    }
}

/// Parse a timestamp tag at the start of `s` (which begins with '[').
///
/// Grammar: `[mm:ss.f]` with exactly two minute digits, two second digits,
/// and 1-3 fraction digits. Fractions normalize to centiseconds: one digit
/// is tenths, three digits are milliseconds rounded to the nearest
/// centisecond. Returns the consumed byte length and the tag time.
fn parse_tag(s: &str) -> Option<(usize, Duration)> {
    let end = s.find(']')?;
    let body = &s[1..end];

    let (minutes, rest) = body.split_once(':')?;
    let (seconds, fraction) = rest.split_once('.')?;

    if minutes.len() != 2 || seconds.len() != 2 {
        return None;
    }
    if fraction.is_empty() || fraction.len() > 3 {
        return None;
    }
    if !all_digits(minutes) || !all_digits(seconds) || !all_digits(fraction) {
        return None;
    }

    let minutes: u64 = minutes.parse().ok()?;
    let secs: u64 = seconds.parse().ok()?;
    let fraction_value: u64 = fraction.parse().ok()?;

    let centis = match fraction.len() {
        1 => fraction_value * 10,
        2 => fraction_value,
        3 => (fraction_value + 5) / 10,
        _ => return None,
    };

    let total_centis = (minutes * 60 + secs) * 100 + centis;
    Some((end + 1, duration_from_centis(total_centis)))
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn is_credit_line(text: &str) -> bool {
    CREDIT_PREFIXES.iter().any(|prefix| text.starts_with(prefix))
}

/// Format a playback position for display: `mm:ss`.
#[must_use]
pub fn format_position(position: Duration) -> String {
    let total = position.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Format a playback position as an LRC tag: `[mm:ss.xx]`.
///
/// Centiseconds are floored, matching how tags are written out.
#[must_use]
pub fn format_tag(position: Duration) -> String {
    let total = position.as_secs();
    let centis = position.subsec_millis() / 10;
    format!("[{:02}:{:02}.{:02}]", total / 60, total % 60, centis)
}
