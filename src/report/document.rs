// src/report/document.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use docx_rs::{
    AlignmentType, Docx, Paragraph, Run, Style, StyleType, Table, TableCell, TableRow,
};
use std::{fs::File, path::Path};
use tracing::info;

use super::Composition;
use crate::tally::Tally;

const TITLE: &str = "Title";
const HEADING_1: &str = "Heading1";
const HEADING_2: &str = "Heading2";

fn styles(docx: Docx) -> Docx {
    docx.add_style(
        Style::new(TITLE, StyleType::Paragraph)
            .name("Title")
            .size(52),
    )
    .add_style(
        Style::new(HEADING_1, StyleType::Paragraph)
            .name("Heading 1")
            .size(32)
            .bold(),
    )
    .add_style(
        Style::new(HEADING_2, StyleType::Paragraph)
            .name("Heading 2")
            .size(26)
            .bold(),
    )
}

fn heading(text: &str, style: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text))
        .style(style)
}

fn cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
}

fn header_cell(text: &str) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text).bold()))
}

/// Two-column table: bold header row, then one row per tally entry in order.
fn tally_table(label: &str, tally: &Tally) -> Table {
    let mut rows = vec![TableRow::new(vec![
        header_cell(label),
        header_cell("Member Count"),
    ])];
    rows.extend(
        tally
            .iter()
            .map(|(value, n)| TableRow::new(vec![cell(value), cell(&n.to_string())])),
    );
    Table::new(rows)
}

fn list_table(values: &[String]) -> Table {
    Table::new(
        values
            .iter()
            .map(|v| TableRow::new(vec![cell(v)]))
            .collect(),
    )
}

/// Assemble the composition report without touching the filesystem.
pub fn build_composition_document(date: NaiveDate, c: &Composition) -> Docx {
    let mut docx = styles(Docx::new())
        .add_paragraph(heading("Parliament Composition", TITLE).align(AlignmentType::Center))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(format!(
            "Date: {}",
            date.format("%Y-%m-%d")
        ))))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(format!(
            "Total count of members: {}",
            c.total
        ))));

    docx = docx
        .add_paragraph(heading("Member Count by Political Party", HEADING_1))
        .add_table(tally_table("Political Party", &c.by_party))
        .add_paragraph(Paragraph::new());

    docx = docx
        .add_paragraph(heading("Member Count by Province", HEADING_1))
        .add_table(tally_table("Province", &c.by_province))
        .add_paragraph(Paragraph::new());

    docx = docx.add_paragraph(heading("Party Member Count by Province", HEADING_1));
    for (province, parties) in &c.party_by_province {
        docx = docx
            .add_paragraph(heading(province, HEADING_2))
            .add_table(tally_table("Political Party", parties))
            .add_paragraph(Paragraph::new());
    }

    docx = docx.add_paragraph(heading("Provincial Scope by Party", HEADING_1));
    for (party, provinces) in &c.provinces_by_party {
        docx = docx
            .add_paragraph(heading(party, HEADING_2))
            .add_table(list_table(provinces))
            .add_paragraph(Paragraph::new());
    }

    docx
}

/// Render the composition report to `path`.
pub fn write_composition_document(path: &Path, date: NaiveDate, c: &Composition) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating document {:?}", path))?;
    build_composition_document(date, c)
        .build()
        .pack(file)
        .with_context(|| format!("packing document {:?}", path))?;
    info!(path = %path.display(), "document created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::roster;
    use regex::Regex;
    use std::fs;
    use std::io::{Cursor, Read};
    use tempfile::tempdir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 7, 15).unwrap()
    }

    fn unzip_document(archive: impl Read + std::io::Seek) -> Result<String> {
        let mut archive = zip::ZipArchive::new(archive)?;
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")?
            .read_to_string(&mut xml)?;
        Ok(xml)
    }

    fn document_xml(docx: Docx) -> Result<String> {
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf)?;
        unzip_document(buf)
    }

    /// Every run of text in document order.
    fn texts(xml: &str) -> Vec<String> {
        let run = Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").unwrap();
        run.captures_iter(xml).map(|c| c[1].to_string()).collect()
    }

    /// Markup of the paragraph holding `text`, searching from byte `from`.
    fn paragraph_of<'a>(xml: &'a str, text: &str, from: usize) -> (usize, &'a str) {
        let needle = format!(">{}<", text);
        let at = from + xml[from..].find(&needle).unwrap();
        let start = xml[..at].rfind("</w:p>").map_or(0, |i| i + "</w:p>".len());
        (at, &xml[start..at])
    }

    #[test]
    fn test_document_content_in_order() -> Result<()> {
        let c = Composition::from_members(&roster())?;
        let xml = document_xml(build_composition_document(date(), &c))?;

        let expected = [
            "Parliament Composition",
            "Date: 2023-07-15",
            "Total count of members: 6",
            "Member Count by Political Party",
            "Political Party", "Member Count",
            "Liberal", "3",
            "Conservative", "2",
            "Bloc Québécois", "1",
            "Member Count by Province",
            "Province", "Member Count",
            "Alberta", "1",
            "Ontario", "3",
            "Quebec", "2",
            "Party Member Count by Province",
            "Alberta",
            "Political Party", "Member Count",
            "Conservative", "1",
            "Ontario",
            "Political Party", "Member Count",
            "Liberal", "2",
            "Conservative", "1",
            "Quebec",
            "Political Party", "Member Count",
            "Bloc Québécois", "1",
            "Liberal", "1",
            "Provincial Scope by Party",
            "Bloc Québécois",
            "Quebec",
            "Conservative",
            "Alberta", "Ontario",
            "Liberal",
            "Ontario", "Quebec",
        ];
        assert_eq!(texts(&xml), expected);
        Ok(())
    }

    #[test]
    fn test_document_styles() -> Result<()> {
        let c = Composition::from_members(&roster())?;
        let xml = document_xml(build_composition_document(date(), &c))?;

        let (_, title) = paragraph_of(&xml, "Parliament Composition", 0);
        assert!(title.contains(r#"w:val="Title""#), "{title}");
        assert!(title.contains(r#"w:val="center""#), "{title}");

        for section in [
            "Member Count by Political Party",
            "Member Count by Province",
            "Party Member Count by Province",
            "Provincial Scope by Party",
        ] {
            let (_, p) = paragraph_of(&xml, section, 0);
            assert!(p.contains(r#"w:val="Heading1""#), "{section}: {p}");
        }

        // province sub-headings follow their section heading
        let (section, _) = paragraph_of(&xml, "Party Member Count by Province", 0);
        for province in ["Alberta", "Ontario", "Quebec"] {
            let (_, p) = paragraph_of(&xml, province, section);
            assert!(p.contains(r#"w:val="Heading2""#), "{province}: {p}");
        }
        let (section, _) = paragraph_of(&xml, "Provincial Scope by Party", 0);
        for party in ["Bloc Québécois", "Conservative", "Liberal"] {
            let (_, p) = paragraph_of(&xml, party, section);
            assert!(p.contains(r#"w:val="Heading2""#), "{party}: {p}");
        }

        // table header cells are bold, body cells are not
        let bold = Regex::new(r"<w:b[\s/>]").unwrap();
        let (_, header) = paragraph_of(&xml, "Political Party", 0);
        assert!(bold.is_match(header), "{header}");
        let (_, body) = paragraph_of(&xml, "Liberal", 0);
        assert!(!bold.is_match(body), "{body}");
        Ok(())
    }

    #[test]
    fn test_write_document() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("report.docx");
        let c = Composition::from_members(&roster())?;
        write_composition_document(&path, date(), &c)?;

        let bytes = fs::read(&path)?;
        assert!(bytes.starts_with(b"PK"));
        let written = unzip_document(fs::File::open(&path)?)?;
        let built = document_xml(build_composition_document(date(), &c))?;
        assert_eq!(texts(&written), texts(&built));
        Ok(())
    }

    #[test]
    fn test_write_empty_composition() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("empty.docx");
        let c = Composition::from_members(&[])?;
        assert_eq!(c.total, 0);
        write_composition_document(&path, date(), &c)?;

        let xml = unzip_document(fs::File::open(&path)?)?;
        assert_eq!(
            texts(&xml),
            [
                "Parliament Composition",
                "Date: 2023-07-15",
                "Total count of members: 0",
                "Member Count by Political Party",
                "Political Party",
                "Member Count",
                "Member Count by Province",
                "Province",
                "Member Count",
                "Party Member Count by Province",
                "Provincial Scope by Party",
            ]
        );
        Ok(())
    }
}
