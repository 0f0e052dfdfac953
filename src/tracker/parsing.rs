use crate::tracker::TrackerError;

/// Split a pasted TLE block into an optional name line plus the two element
/// lines. The element lines must carry their standard line numbers.
pub fn parse_tle_lines(tle: &str) -> Result<(Option<String>, String, String), TrackerError> {
    let lines: Vec<&str> = tle
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let (name, line1, line2) = match lines.len() {
        2 => (None, lines[0], lines[1]),
        3 => (Some(lines[0]), lines[1], lines[2]),
        _ => return Err(TrackerError::InvalidTleFormat),
    };

    if !line1.starts_with("1 ") || !line2.starts_with("2 ") {
        return Err(TrackerError::InvalidTleFormat);
    }

    Ok((name.map(String::from), line1.to_string(), line2.to_string()))
}
