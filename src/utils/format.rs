//! Formatting utilities for file sizes, dates, and elapsed times.

use crate::config::MS_PER_SECOND;

/// Format file size for display (e.g., "1.2K", "3.4M").
///
/// Returns a right-aligned string for terminal tables or a compact string otherwise.
pub fn format_size(size: Option<u64>, right_align: bool) -> String {
    match size {
        None => {
            if right_align {
                "    -".to_string()
            } else {
                "-".to_string()
            }
        }
        Some(bytes) if bytes >= 1_000_000 => {
            let mb = bytes as f64 / 1_000_000.0;
            if right_align {
                format!("{:4.1}M", mb)
            } else {
                format!("{:.1}M", mb)
            }
        }
        Some(bytes) if bytes >= 1_000 => {
            let kb = bytes as f64 / 1_000.0;
            if right_align {
                format!("{:4.1}K", kb)
            } else {
                format!("{:.1}K", kb)
            }
        }
        Some(bytes) if right_align => format!("{:4}B", bytes),
        Some(bytes) => format!("{}B", bytes),
    }
}

/// Format an integer with comma thousands separators (e.g., "12,345").
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format Unix timestamp for terminal display (e.g., "Jan  5 12:34").
///
/// Uses approximate month/day calculation.
pub fn format_date_short(timestamp: Option<u64>) -> String {
    match timestamp {
        None => "            ".to_string(),
        Some(ts) => {
            let months = [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ];
            let days = ts / 86400;
            let month = ((days % 365) / 30) as usize % 12;
            let day = ((days % 365) % 30) + 1;
            let hour = (ts % 86400) / 3600;
            let min = (ts % 3600) / 60;
            format!("{} {:2} {:02}:{:02}", months[month], day, hour, min)
        }
    }
}

/// Format elapsed milliseconds as seconds with two decimals (e.g., "1.23s").
pub fn format_elapsed(ms: f64) -> String {
    format!("{:.2}s", ms / MS_PER_SECOND)
}
