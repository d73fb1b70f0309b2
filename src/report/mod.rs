// src/report/mod.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::members::{Member, MemberField};
use crate::tally::{
    count_by, cross_count_by, distinct_by, CrossTally, Listing, Order, Tally, TallyError,
};

pub mod document;
pub mod workbook;

pub use document::write_composition_document;
pub use workbook::{write_members_workbook, MemberRow, WorkbookLayout};

/// Where reports go and which date they are stamped with.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub out_dir: PathBuf,
    pub date: NaiveDate,
}

impl ReportConfig {
    pub fn new(out_dir: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            out_dir: out_dir.into(),
            date,
        }
    }

    /// Create the output directory if needed. Returns `true` when it was created.
    pub fn ensure_out_dir(&self) -> Result<bool> {
        if self.out_dir.is_dir() {
            info!(dir = %self.out_dir.display(), "output directory already exists");
            return Ok(false);
        }
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating output directory {:?}", self.out_dir))?;
        info!(dir = %self.out_dir.display(), "created output directory");
        Ok(true)
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.out_dir
            .join(format!("members-as-of-{}.json", self.date_str()))
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.out_dir
            .join(format!("members-as-of-{}.xlsx", self.date_str()))
    }

    pub fn document_path(&self) -> PathBuf {
        self.out_dir
            .join(format!("parliament-report-{}.docx", self.date_str()))
    }

    pub fn portrait_dir(&self) -> &Path {
        &self.out_dir
    }
}

/// Aggregates rendered into the composition document.
#[derive(Clone, Debug)]
pub struct Composition {
    pub total: usize,
    /// Largest caucus first.
    pub by_party: Tally,
    pub by_province: Tally,
    /// Province → party counts, largest caucus first within each province.
    pub party_by_province: CrossTally,
    pub provinces_by_party: Listing,
}

impl Composition {
    pub fn from_members(members: &[Member]) -> Result<Self, TallyError> {
        Ok(Self {
            total: members.len(),
            by_party: count_by(members, &MemberField::Party, Order::ByCountDesc)?,
            by_province: count_by(members, &MemberField::Province, Order::ByValue)?,
            party_by_province: cross_count_by(
                members,
                &MemberField::Province,
                &MemberField::Party,
                Order::ByCountDesc,
            )?,
            provinces_by_party: distinct_by(members, &MemberField::Party, &MemberField::Province)?,
        })
    }
}
