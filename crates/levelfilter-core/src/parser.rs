/// Locate the level tag of a log line.
///
/// Returns the byte offsets of the first `[` and of the first `]` after it.
/// Brackets later in the message body are never considered.
pub fn level_span(line: &[u8]) -> Option<(usize, usize)> {
    let open = line.iter().position(|&b| b == b'[')?;
    let close = line[open..].iter().position(|&b| b == b']')?;
    Some((open, open + close))
}

/// Extract the level name between the first bracket pair.
///
/// An untagged line yields an empty slice, which matches no configured level.
pub fn extract_level(line: &[u8]) -> &[u8] {
    match level_span(line) {
        Some((open, close)) => &line[open + 1..close],
        None => &[],
    }
}
