/// Decode bytes as UTF-8, replacing invalid sequences and dropping a leading BOM
pub fn extract_text(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_is_dropped() {
        assert_eq!(extract_text("\u{feff}hello".as_bytes()), "hello");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(extract_text(&[b'a', 0xff, b'b']), "a\u{fffd}b");
    }
}
