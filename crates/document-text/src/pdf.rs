use crate::error::ExtractionError;

/// True when the bytes start with the PDF magic header
pub fn looks_like_pdf(data: &[u8]) -> bool {
    data.len() > 4 && &data[0..4] == b"%PDF"
}

/// Extract all page text with pdf-extract.
///
/// Pages come back joined; form feeds between pages are turned into blank
/// lines so the prompt reads as continuous prose.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    if !looks_like_pdf(data) {
        return Err(ExtractionError::Pdf("missing %PDF header".to_string()));
    }

    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

    Ok(text.replace('\x0C', "\n\n").trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_detect_pdf_header() {
        assert!(looks_like_pdf(b"%PDF-1.4 test"));
        assert!(!looks_like_pdf(b"Not a PDF file"));
        assert!(!looks_like_pdf(b"%PD"));
    }

    #[test]
    fn test_non_pdf_bytes_are_rejected() {
        let err = extract_text(b"plain words").unwrap_err();
        assert!(matches!(err, ExtractionError::Pdf(_)));
    }
}
