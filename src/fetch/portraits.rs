use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::members::Member;

/// Local file name for a member's portrait: spaces become dashes, `.jpg` appended.
///
/// Path separators map to `-` as well and runs of dots collapse to one, with
/// dots at either end stripped, so the result is always a single plain file name.
pub fn portrait_filename(fullname: &str) -> String {
    let mut stem = String::with_capacity(fullname.len());
    for c in fullname.trim().chars() {
        let c = match c {
            ' ' | '/' | '\\' | ':' => '-',
            c if c.is_control() => '-',
            c => c,
        };
        if c == '.' && stem.ends_with('.') {
            continue;
        }
        stem.push(c);
    }
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "portrait.jpg".to_string()
    } else {
        format!("{}.jpg", stem)
    }
}

/// Hands out portrait file names that are unique within one run.
///
/// The first member with a given name gets [`portrait_filename`]; later
/// members with the same name get their id appended (`Full-Name-123.jpg`),
/// then a counter if that is taken too.
#[derive(Debug, Default)]
pub struct PortraitNames {
    used: HashSet<String>,
}

impl PortraitNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, member: &Member) -> String {
        let base = portrait_filename(&member.fullname);
        if self.used.insert(base.clone()) {
            return base;
        }
        let stem = base.trim_end_matches(".jpg");
        let with_id = portrait_filename(&format!("{} {}", stem, member.id));
        if self.used.insert(with_id.clone()) {
            return with_id;
        }
        let stem = with_id.trim_end_matches(".jpg").to_string();
        let mut n = 2usize;
        loop {
            let candidate = format!("{}-{}.jpg", stem, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Download the member's portrait and save it as `dest_dir/file_name`.
/// Returns the full path of the saved file.
pub async fn download_portrait(
    client: &Client,
    member: &Member,
    dest_dir: impl AsRef<Path>,
    file_name: &str,
) -> Result<PathBuf> {
    let dest_path = dest_dir.as_ref().join(file_name);

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating portrait dir for {:?}", dest_path))?;
    }

    let resp = client
        .get(member.img_url.as_str())
        .send()
        .await
        .with_context(|| format!("GET {} failed", member.img_url))?
        .error_for_status()
        .with_context(|| format!("Non-success status for {}", member.img_url))?;
    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("reading body of {}", member.img_url))?;
    fs::write(&dest_path, &bytes)
        .await
        .with_context(|| format!("writing portrait {:?}", dest_path))?;

    Ok(dest_path)
}
