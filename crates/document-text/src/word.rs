//! Raw text from WordprocessingML (`.docx`)
//!
//! Only the main document part is read. Text runs are concatenated, tabs and
//! line breaks are kept, and each paragraph ends with a blank line.

use std::io::{Cursor, Read};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

lazy_static! {
    /// Text runs, tabs, breaks and paragraph ends, in document order.
    /// A self-closing `<w:t .../>` is an empty run and must not open a text match.
    static ref TOKEN: Regex = Regex::new(
        r"(?s)<w:t(?:\s[^>]*[^/>])?>(?P<text>.*?)</w:t>|(?P<tab><w:tab\s*/>)|(?P<br><w:(?:br|cr)(?:\s[^>]*)?/>)|(?P<para></w:p>)"
    )
    .expect("valid token regex");

    static ref ENTITY: Regex = Regex::new(r"&(?:#x(?P<hex>[0-9a-fA-F]+)|#(?P<dec>[0-9]+)|(?P<name>amp|lt|gt|quot|apos));")
        .expect("valid entity regex");
}

/// Extract the body text of a `.docx` file
pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(data)).map_err(|e| ExtractionError::Archive(e.to_string()))?;

    let mut xml = String::new();
    {
        let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => ExtractionError::MissingPart(DOCUMENT_PART),
            other => ExtractionError::Archive(other.to_string()),
        })?;
        part.read_to_string(&mut xml)?;
    }

    Ok(text_from_document_xml(&xml))
}

/// Flatten `word/document.xml` into plain text
pub fn text_from_document_xml(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);

    for caps in TOKEN.captures_iter(xml) {
        if let Some(text) = caps.name("text") {
            out.push_str(&decode_entities(text.as_str()));
        } else if caps.name("tab").is_some() {
            out.push('\t');
        } else if caps.name("br").is_some() {
            out.push('\n');
        } else if caps.name("para").is_some() {
            out.push_str("\n\n");
        }
    }

    out.trim_end().to_string()
}

fn decode_entities(raw: &str) -> String {
    ENTITY
        .replace_all(raw, |caps: &regex::Captures| {
            let code = if let Some(hex) = caps.name("hex") {
                u32::from_str_radix(hex.as_str(), 16).ok()
            } else if let Some(dec) = caps.name("dec") {
                dec.as_str().parse::<u32>().ok()
            } else {
                None
            };

            if let Some(code) = code {
                return char::from_u32(code)
                    .map(String::from)
                    .unwrap_or_else(|| caps[0].to_string());
            }

            match caps.name("name").map(|m| m.as_str()) {
                Some("amp") => "&".to_string(),
                Some("lt") => "<".to_string(),
                Some("gt") => ">".to_string(),
                Some("quot") => "\"".to_string(),
                Some("apos") => "'".to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    fn build_docx(xml: &str) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            writer.start_file("[Content_Types].xml", options).unwrap();
            writer.write_all(b"<Types/>").unwrap();
            writer.start_file(DOCUMENT_PART, options).unwrap();
            writer.write_all(xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_paragraphs_become_blank_line_separated() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Safeguarding Policy</w:t></w:r></w:p><w:p><w:r><w:t xml:space="preserve">Every child </w:t></w:r><w:r><w:t>is unique.</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            text_from_document_xml(&xml),
            "Safeguarding Policy\n\nEvery child is unique."
        );
    }

    #[test]
    fn test_tabs_and_breaks_are_kept() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Age</w:t><w:tab/><w:t>Ratio</w:t><w:br/><w:t>2-3</w:t><w:tab/><w:t>1:4</w:t></w:r></w:p>"#,
        );
        assert_eq!(text_from_document_xml(&xml), "Age\tRatio\n2-3\t1:4");
    }

    #[test]
    fn test_empty_self_closing_run_is_skipped() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t xml:space="preserve"/></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>Ratios</w:t></w:r></w:p><w:p><w:r><w:t/></w:r><w:r><w:t>Staffing</w:t></w:r></w:p>"#,
        );
        assert_eq!(text_from_document_xml(&xml), "Ratios\n\nStaffing");
    }

    #[test]
    fn test_table_markup_is_not_mistaken_for_text() {
        let xml = document_xml(
            r#"<w:tbl><w:tblPr/><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(text_from_document_xml(&xml), "Cell");
    }

    #[test]
    fn test_entities_are_decoded() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Staff &amp; volunteers &lt;18&gt; &#8211; &#x2019;ok&quot;</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            text_from_document_xml(&xml),
            "Staff & volunteers <18> \u{2013} \u{2019}ok\""
        );
    }

    #[test]
    fn test_extracts_from_real_archive() {
        let docx = build_docx(&document_xml(
            r#"<w:p><w:r><w:t>Key person procedures</w:t></w:r></w:p>"#,
        ));
        assert_eq!(extract_text(&docx).unwrap(), "Key person procedures");
    }

    #[test]
    fn test_archive_without_document_part() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file(
                    "other.xml",
                    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
                )
                .unwrap();
            writer.write_all(b"<x/>").unwrap();
            writer.finish().unwrap();
        }
        let err = extract_text(&buf.into_inner()).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingPart(DOCUMENT_PART)));
    }
}
