/// Fold a whole archive into uploader/package/version buckets
use crate::{
    debug,
    extract::{self, Filters},
    types::UploadRecord,
};

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::BTreeMap, io::BufRead};

lazy_static! {
    /// Every message in the archive starts with this mbox separator
    static ref MESSAGE_START: Regex = Regex::new(r"^From bounces@\S+").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadKey {
    /// `None` when the upload carried no Changed-By
    pub uploader: Option<String>,
    pub package: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    // Position of the first upload filed under this key
    seq: usize,
    record: UploadRecord,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    entries: BTreeMap<UploadKey, Entry>,
    next_seq: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a record under (Changed-By, Source, Version).
    /// A later record with the same key replaces the earlier one.
    pub fn insert(&mut self, record: UploadRecord) {
        let key = UploadKey {
            uploader: record.changed_by().map(|s| s.to_owned()),
            package: record.source().unwrap_or_default().to_owned(),
            version: record.version().unwrap_or_default().to_owned(),
        };
        match self.entries.get_mut(&key) {
            Some(entry) => entry.record = record,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.entries.insert(key, Entry { seq, record });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records sorted by uploader, package, then version
    pub fn iter(&self) -> impl Iterator<Item = (&UploadKey, &UploadRecord)> {
        self.entries.iter().map(|(k, e)| (k, &e.record))
    }

    /// Records in the order they first showed up in the archive
    pub fn in_archive_order(&self) -> Vec<(&UploadKey, &UploadRecord)> {
        let mut res: Vec<_> = self.entries.iter().collect();
        res.sort_by_key(|(_, e)| e.seq);
        res.into_iter().map(|(k, e)| (k, &e.record)).collect()
    }

    /// The uploader -> package -> version view of the history
    #[allow(clippy::type_complexity)]
    pub fn nested(&self) -> BTreeMap<Option<&str>, BTreeMap<&str, BTreeMap<&str, &UploadRecord>>> {
        let mut res: BTreeMap<Option<&str>, BTreeMap<&str, BTreeMap<&str, &UploadRecord>>> =
            BTreeMap::new();
        for (key, record) in self.iter() {
            res.entry(key.uploader.as_deref())
                .or_default()
                .entry(key.package.as_str())
                .or_default()
                .insert(key.version.as_str(), record);
        }
        res
    }
}

/// Split an archive into messages and fold every announcement into a [`History`].
pub fn aggregate<R: BufRead>(mut reader: R, filters: &Filters) -> Result<History> {
    let mut history = History::new();
    let mut message = String::new();
    let mut buf = Vec::new();
    let mut count = 0;

    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .context("Failed to read archive")?;
        if n == 0 {
            break;
        }
        // Archives are mostly UTF-8, but old messages sometimes are not
        let line = String::from_utf8_lossy(&buf);
        if MESSAGE_START.is_match(&line) && !message.is_empty() {
            fold(&mut history, &message, filters);
            count += 1;
            message.clear();
        }
        message.push_str(&line);
    }
    if !message.is_empty() {
        fold(&mut history, &message, filters);
        count += 1;
    }

    debug!("Read {} messages, kept {} uploads", count, history.len());
    Ok(history)
}

fn fold(history: &mut History, message: &str, filters: &Filters) {
    if let Some(record) = extract::extract(message, filters) {
        history.insert(record);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::extract::test::{announcement, upload};
    use crate::types::Field;
    use std::io::Cursor;

    fn get<'a>(
        history: &'a History,
        uploader: Option<&'a str>,
        package: &str,
        version: &str,
    ) -> Option<&'a UploadRecord> {
        history
            .nested()
            .get(&uploader)
            .and_then(|pkgs| pkgs.get(package))
            .and_then(|versions| versions.get(version))
            .copied()
    }

    fn archive(messages: &[String]) -> String {
        messages.concat()
    }

    #[test]
    fn two_versions_of_one_package() {
        let mbox = archive(&[
            upload("foo", "1.0", "Alice <a@x.com>"),
            upload("foo", "2.0", "Alice <a@x.com>"),
        ]);
        let history = aggregate(Cursor::new(mbox), &Filters::default()).unwrap();
        let nested = history.nested();
        assert_eq!(nested.len(), 1);
        let pkgs = &nested[&Some("Alice <a@x.com>")];
        assert_eq!(pkgs.len(), 1);
        let versions: Vec<&str> = pkgs["foo"].keys().copied().collect();
        assert_eq!(versions, vec!["1.0", "2.0"]);
        assert_eq!(pkgs["foo"]["2.0"].version(), Some("2.0"));
    }

    #[test]
    fn aggregation_is_deterministic() {
        let mbox = archive(&[
            upload("foo", "1.0", "Alice <a@x.com>"),
            upload("bar", "0.3", "Bob <bob@example.com>"),
            upload("foo", "1.1", "Alice <a@x.com>"),
        ]);
        let a = aggregate(Cursor::new(mbox.clone()), &Filters::default()).unwrap();
        let b = aggregate(Cursor::new(mbox), &Filters::default()).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a, b);
    }

    #[test]
    fn filtered_uploads_are_left_out() {
        let mbox = archive(&[
            upload("foo", "1.0", "Alice <alice@example.com>"),
            upload("bar", "0.3", "Bob <bob@example.com>"),
        ]);
        let filters = Filters::new(vec!["alice@example.com".to_string()], vec![]);
        let history = aggregate(Cursor::new(mbox), &filters).unwrap();
        assert_eq!(history.len(), 1);
        assert!(get(&history, Some("Bob <bob@example.com>"), "bar", "0.3")
            .is_none());
        assert!(get(&history, Some("Alice <alice@example.com>"), "foo", "1.0")
            .is_some());
    }

    #[test]
    fn duplicates_keep_the_last_one() {
        let first = upload("foo", "1.0", "Alice <a@x.com>");
        let second = first.replace("New upstream release.", "Rebuild.");
        let mbox = archive(&[first, upload("bar", "1", "Alice <a@x.com>"), second]);
        let history = aggregate(Cursor::new(mbox), &Filters::default()).unwrap();
        assert_eq!(history.len(), 2);
        let record = get(&history, Some("Alice <a@x.com>"), "foo", "1.0").unwrap();
        assert!(record.get(Field::Changes).unwrap().contains("Rebuild."));
        // Still filed where it first appeared
        let order: Vec<&str> = history
            .in_archive_order()
            .iter()
            .map(|(k, _)| k.package.as_str())
            .collect();
        assert_eq!(order, vec!["foo", "bar"]);
    }

    #[test]
    fn missing_changed_by_is_kept() {
        let msg = announcement(
            "foo (1.0) xenial; urgency=medium",
            "Signed-By: Carol <carol@example.com>",
            "Changesfile not available.",
        );
        let history = aggregate(Cursor::new(msg), &Filters::default()).unwrap();
        assert!(get(&history, None, "foo", "1.0").is_some());
    }

    #[test]
    fn junk_between_messages() {
        let mut mbox = String::from("This archive was generated by Pipermail.\n\n");
        mbox.push_str(&upload("foo", "1.0", "Alice <a@x.com>"));
        let history = aggregate(Cursor::new(mbox), &Filters::default()).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn empty_archive() {
        let history = aggregate(Cursor::new(""), &Filters::default()).unwrap();
        assert!(history.is_empty());
    }
}
