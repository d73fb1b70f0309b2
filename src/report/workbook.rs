// src/report/workbook.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Image, Workbook};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::members::Member;

pub const HEADERS: [&str; 8] = [
    "ID",
    "Full Name",
    "Political Party",
    "Constituency",
    "Province",
    "Image",
    "Image URL",
    "Member Page URL",
];

/// Column F holds the portrait instead of text.
pub const IMAGE_COL: u16 = 5;

/// A member plus the portrait to embed next to them, if one was downloaded.
#[derive(Clone, Debug)]
pub struct MemberRow<'a> {
    pub member: &'a Member,
    pub portrait: Option<PathBuf>,
}

impl MemberRow<'_> {
    pub fn cells(&self) -> [&str; 8] {
        let m = self.member;
        [
            m.id.as_str(),
            m.fullname.as_str(),
            m.party.as_str(),
            m.constituency.as_str(),
            m.province.as_str(),
            "",
            m.img_url.as_str(),
            m.member_url.as_str(),
        ]
    }
}

/// Width of each column: longest cell in characters (header included) plus one.
pub fn column_widths(rows: &[MemberRow<'_>]) -> [f64; 8] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths.map(|w| (w + 1) as f64)
}

/// Excel column width for an image `px` pixels wide.
pub fn image_col_width(px: f64) -> f64 {
    px / 7.0 + 1.0
}

/// Row height in points for an image `px` pixels tall.
pub fn image_row_height(px: f64) -> f64 {
    px * 3.0 / 4.0 + 1.0
}

pub fn sheet_name(date: NaiveDate) -> String {
    format!("Parliament Members {}", date.format("%Y-%m-%d"))
}

/// Column F width for the given portrait widths in pixels: the widest one wins.
pub fn portrait_column_width(pixel_widths: impl IntoIterator<Item = f64>) -> Option<f64> {
    pixel_widths
        .into_iter()
        .map(image_col_width)
        .fold(None, |widest: Option<f64>, w| Some(widest.map_or(w, |cur| cur.max(w))))
}

/// What [`write_members_workbook`] did with the portraits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkbookLayout {
    /// Portraits actually embedded.
    pub embedded: usize,
    /// Width given to column F, if any portrait was embedded.
    pub image_col_width: Option<f64>,
    /// `(row, height)` for each row that got a portrait.
    pub row_heights: Vec<(u32, f64)>,
}

/// Write the member roster with embedded portraits to `path`.
pub fn write_members_workbook(
    path: &Path,
    date: NaiveDate,
    rows: &[MemberRow<'_>],
) -> Result<WorkbookLayout> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    let name = sheet_name(date);
    sheet.set_name(&name)?;
    info!(sheet = %name, "active worksheet");

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    debug!("column headers added");

    let widths = column_widths(rows);
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    let mut layout = WorkbookLayout::default();
    let mut pixel_widths = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            if col as u16 == IMAGE_COL {
                continue;
            }
            sheet.write_string(r, col as u16, *cell)?;
        }

        let Some(portrait) = &row.portrait else {
            continue;
        };
        match Image::new(portrait) {
            Ok(image) => {
                sheet.insert_image(r, IMAGE_COL, &image)?;
                let height = image_row_height(image.height());
                sheet.set_row_height(r, height)?;
                layout.row_heights.push((r, height));
                pixel_widths.push(image.width());
                layout.embedded += 1;
            }
            Err(e) => {
                warn!(path = %portrait.display(), error = %e, "skipping unreadable portrait");
            }
        }
    }
    layout.image_col_width = portrait_column_width(pixel_widths);
    if let Some(w) = layout.image_col_width {
        sheet.set_column_width(IMAGE_COL, w)?;
    }
    info!(rows = rows.len(), portraits = layout.embedded, "all members added to worksheet");

    workbook
        .save(path)
        .with_context(|| format!("saving workbook {:?}", path))?;
    info!(path = %path.display(), "workbook created");
    Ok(layout)
}
