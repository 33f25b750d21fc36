//! WordprocessingML package writer
//!
//! Emits the smallest set of parts Word needs: content types, package
//! relationships, the main document, and a styles part defining every style
//! the document refers to.

use std::collections::BTreeSet;
use std::io::{Seek, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{Block, Document, Row, Run, Table};
use crate::error::Result;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// Letter paper, 1" margins
const SECTION: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

/// Zip the document parts into `writer`
pub(super) fn write_package<W: Write + Seek>(doc: &Document, writer: W) -> Result<W> {
    let parts = [
        ("[Content_Types].xml", format!("{}{}", XML_HEADER, CONTENT_TYPES)),
        ("_rels/.rels", format!("{}{}", XML_HEADER, PACKAGE_RELS)),
        ("word/_rels/document.xml.rels", format!("{}{}", XML_HEADER, DOCUMENT_RELS)),
        ("word/document.xml", document_xml(doc)),
        ("word/styles.xml", styles_xml(doc)),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(writer);
    for (name, contents) in parts {
        zip.start_file(name, options)?;
        zip.write_all(contents.as_bytes())?;
    }
    Ok(zip.finish()?)
}

fn document_xml(doc: &Document) -> String {
    let mut xml = format!(r#"{}<w:document xmlns:w="{}"><w:body>"#, XML_HEADER, W_NS);

    for block in doc.blocks() {
        match block {
            Block::Heading { text, level } => {
                xml.push_str(&format!(
                    r#"<w:p><w:pPr><w:pStyle w:val="Heading{}"/></w:pPr><w:r>{}</w:r></w:p>"#,
                    level,
                    text_xml(text)
                ));
            }
            Block::Table(table) => push_table(&mut xml, table),
            Block::PageBreak => xml.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#),
        }
    }

    xml.push_str(SECTION);
    xml.push_str("</w:body></w:document>");
    xml
}

fn push_table(xml: &mut String, table: &Table) {
    xml.push_str("<w:tbl>");
    xml.push_str(&format!(
        r#"<w:tblPr><w:tblStyle w:val="{}"/><w:tblW w:w="5000" w:type="pct"/><w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/></w:tblPr>"#,
        style_id(&table.style)
    ));
    xml.push_str(r#"<w:tblGrid><w:gridCol w:w="9360"/></w:tblGrid>"#);

    for (i, row) in table.rows.iter().enumerate() {
        let strip_top = i == 0 && table.strip_first_top_border;
        push_row(xml, row, strip_top);
    }

    xml.push_str("</w:tbl>");
}

fn push_row(xml: &mut String, row: &Row, strip_top: bool) {
    xml.push_str("<w:tr><w:tc><w:tcPr>");
    xml.push_str(r#"<w:tcW w:w="5000" w:type="pct"/>"#);
    if strip_top {
        xml.push_str(r#"<w:tcBorders><w:top w:val="nil"/></w:tcBorders>"#);
    }
    xml.push_str("</w:tcPr>");
    xml.push_str(r#"<w:p><w:pPr><w:spacing w:before="0" w:after="0"/><w:jc w:val="left"/></w:pPr>"#);
    for run in &row.runs {
        push_run(xml, run);
    }
    xml.push_str("</w:p></w:tc></w:tr>");
}

fn push_run(xml: &mut String, run: &Run) {
    let style = &run.style;
    let font = escape_xml(&style.font);
    let half_points = u32::from(style.size) * 2;

    xml.push_str("<w:r><w:rPr>");
    xml.push_str(&format!(
        r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:eastAsia="{0}" w:cs="{0}"/>"#,
        font
    ));
    if style.bold {
        xml.push_str("<w:b/><w:bCs/>");
    }
    xml.push_str(&format!(r#"<w:color w:val="{}"/>"#, style.color.to_hex()));
    xml.push_str(&format!(
        r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#,
        half_points
    ));
    xml.push_str("</w:rPr>");
    xml.push_str(&text_xml(&run.text));
    xml.push_str("</w:r>");
}

/// Run content: text pieces with tabs as `<w:tab/>`
fn text_xml(text: &str) -> String {
    let mut xml = String::new();
    for (i, piece) in text.split('\t').enumerate() {
        if i > 0 {
            xml.push_str("<w:tab/>");
        }
        if !piece.is_empty() {
            xml.push_str(&format!(
                r#"<w:t xml:space="preserve">{}</w:t>"#,
                escape_xml(piece)
            ));
        }
    }
    xml
}

fn styles_xml(doc: &Document) -> String {
    let mut headings = BTreeSet::new();
    let mut tables = BTreeSet::new();
    for block in doc.blocks() {
        match block {
            Block::Heading { level, .. } => {
                headings.insert(*level);
            }
            Block::Table(table) => {
                tables.insert(table.style.as_str());
            }
            Block::PageBreak => {}
        }
    }

    let mut xml = format!(r#"{}<w:styles xmlns:w="{}">"#, XML_HEADER, W_NS);
    xml.push_str(r#"<w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/><w:szCs w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#);
    xml.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#);
    xml.push_str(r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:uiPriority w:val="99"/><w:semiHidden/><w:unhideWhenUsed/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style>"#);

    for level in headings {
        let size = match level {
            1 => 32,
            2 => 26,
            _ => 22,
        };
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="Heading{0}"><w:name w:val="heading {0}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="200" w:after="0"/><w:outlineLvl w:val="{1}"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="4F81BD"/><w:sz w:val="{2}"/><w:szCs w:val="{2}"/></w:rPr></w:style>"#,
            level,
            level - 1,
            size
        ));
    }

    for name in tables {
        xml.push_str(&format!(
            r#"<w:style w:type="table" w:styleId="{}"><w:name w:val="{}"/><w:basedOn w:val="TableNormal"/><w:uiPriority w:val="60"/><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="8" w:space="0" w:color="4F81BD"/><w:bottom w:val="single" w:sz="8" w:space="0" w:color="4F81BD"/></w:tblBorders></w:tblPr></w:style>"#,
            style_id(name),
            escape_xml(name)
        ));
    }

    xml.push_str("</w:styles>");
    xml
}

/// Style id for a display name: its ASCII letters and digits
fn style_id(name: &str) -> String {
    let id: String = name.chars().filter(char::is_ascii_alphanumeric).collect();
    if id.is_empty() {
        "TableGrid".to_string()
    } else {
        id
    }
}

/// Escape text for XML, dropping control characters XML 1.0 forbids
fn escape_xml(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect::<String>()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
