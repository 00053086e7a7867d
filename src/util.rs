/// Formats milliseconds as `[M:]SS.mmm`; minutes are omitted below one minute.
pub fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    let millis = ms % 1000;
    let minutes = secs / 60;
    let secs = secs % 60;

    if minutes > 0 {
        format!("{minutes}:{secs:02}.{millis:03}")
    } else {
        format!("{secs:02}.{millis:03}")
    }
}

pub fn format_best(best: Option<u64>) -> String {
    best.map(format_ms).unwrap_or_else(|| "—".to_string())
}
