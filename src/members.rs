// src/members.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::tally::{Field, Record};

/// One sitting member as listed on the directory page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub fullname: String,
    pub party: String,
    pub constituency: String,
    pub province: String,
    pub img_url: String,
    pub member_url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberField {
    Id,
    FullName,
    Party,
    Constituency,
    Province,
    ImgUrl,
    MemberUrl,
}

impl MemberField {
    pub const ALL: [MemberField; 7] = [
        MemberField::Id,
        MemberField::FullName,
        MemberField::Party,
        MemberField::Constituency,
        MemberField::Province,
        MemberField::ImgUrl,
        MemberField::MemberUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberField::Id => "id",
            MemberField::FullName => "fullname",
            MemberField::Party => "party",
            MemberField::Constituency => "constituency",
            MemberField::Province => "province",
            MemberField::ImgUrl => "img_url",
            MemberField::MemberUrl => "member_url",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn of<'m>(&self, member: &'m Member) -> &'m str {
        match self {
            MemberField::Id => &member.id,
            MemberField::FullName => &member.fullname,
            MemberField::Party => &member.party,
            MemberField::Constituency => &member.constituency,
            MemberField::Province => &member.province,
            MemberField::ImgUrl => &member.img_url,
            MemberField::MemberUrl => &member.member_url,
        }
    }
}

impl Field<Member> for MemberField {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn get<'r>(&self, record: &'r Member) -> Option<&'r str> {
        Some(self.of(record))
    }
}

impl Record for Member {
    fn value(&self, field: &str) -> Option<&str> {
        MemberField::from_str(field).map(|f| f.of(self))
    }
}

/// Write members as pretty JSON.
pub fn save_snapshot(path: &Path, members: &[Member]) -> Result<()> {
    let json = serde_json::to_string_pretty(members)?;
    fs::write(path, json).with_context(|| format!("writing snapshot {:?}", path))?;
    Ok(())
}

/// Read members back from a snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<Vec<Member>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading snapshot {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parsing snapshot {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::{count_by, Named, Order};
    use tempfile::tempdir;

    fn member(name: &str, party: &str, province: &str) -> Member {
        Member {
            id: "1".into(),
            fullname: name.into(),
            party: party.into(),
            constituency: "Somewhere".into(),
            province: province.into(),
            img_url: "https://example.org/a.jpg".into(),
            member_url: "https://example.org/m(1)".into(),
        }
    }

    #[test]
    fn test_field_names_round_trip() {
        for f in MemberField::ALL {
            assert_eq!(MemberField::from_str(f.as_str()), Some(f));
        }
        assert_eq!(MemberField::from_str(" Party "), Some(MemberField::Party));
        assert_eq!(MemberField::from_str("riding"), None);
    }

    #[test]
    fn test_typed_and_named_keys_agree() {
        let members = vec![
            member("A B", "Liberal", "Ontario"),
            member("C D", "Conservative", "Alberta"),
            member("E F", "Liberal", "Quebec"),
        ];
        let typed = count_by(&members, &MemberField::Party, Order::ByCountDesc).unwrap();
        let named = count_by(&members, &Named("party"), Order::ByCountDesc).unwrap();
        assert_eq!(typed, named);
        assert_eq!(typed["Liberal"], 2);

        assert!(count_by(&members, &Named("riding"), Order::ByValue).is_err());
    }

    #[test]
    fn test_snapshot_round_trip() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("members.json");
        let members = vec![member("A B", "Liberal", "Ontario")];
        save_snapshot(&path, &members)?;
        assert_eq!(load_snapshot(&path)?, members);
        Ok(())
    }

    #[test]
    fn test_snapshot_rejects_missing_field() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("broken.json");
        fs::write(&path, r#"[{"id":"1","fullname":"A B","party":"Liberal"}]"#)?;
        assert!(load_snapshot(&path).is_err());
        Ok(())
    }
}
