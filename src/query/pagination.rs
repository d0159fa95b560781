//! Client/server record-limit negotiation.

/// Page size after combining the server limit with the client's raw
/// `limit` parameter. Zero means unbounded.
///
/// The server limit wins when the client value is not a positive run of
/// decimal digits, or when it exceeds a bounded server limit. Malformed client input is never an error.
pub fn effective_limit(server_limit: i64, client_limit: &str) -> usize {
    let server = if server_limit > 0 {
        server_limit as u64
    } else {
        0
    };

    let client = match parse_client_limit(client_limit) {
        Some(value) if value > 0 => value,
        _ => return server as usize,
    };

    if server > 0 && client > server {
        return server as usize;
    }
    client as usize
}

// Only unsigned decimal digits; signs and whitespace are rejected.
fn parse_client_limit(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Rows to request from the store for a page of `limit` records: one extra
/// to detect that more are available. `None` when unbounded.
pub fn fetch_size(limit: usize) -> Option<usize> {
    if limit == 0 {
        None
    } else {
        Some(limit.saturating_add(1))
    }
}

/// Trim a fetch made with [`fetch_size`] back to `limit` rows. Returns the
/// page and whether records were left behind.
pub fn truncate<T>(mut rows: Vec<T>, limit: usize) -> (Vec<T>, bool) {
    if limit > 0 && rows.len() > limit {
        rows.truncate(limit);
        (rows, true)
    } else {
        (rows, false)
    }
}
