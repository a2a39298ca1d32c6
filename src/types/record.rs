use std::collections::BTreeMap;
use std::fmt;

/// Fields we pick out of an upload announcement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Source,
    Version,
    Distribution,
    ChangedBy,
    Maintainer,
    SignedBy,
    Date,
    Architecture,
    Binary,
    Format,
    Urgency,
    OriginalMaintainer,
    Description,
    Changes,
    ChecksumsSha1,
    /// Not a real control field: collects the launchpad link in the announcement
    Url,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::Source,
        Field::Version,
        Field::Distribution,
        Field::ChangedBy,
        Field::Maintainer,
        Field::SignedBy,
        Field::Date,
        Field::Architecture,
        Field::Binary,
        Field::Format,
        Field::Urgency,
        Field::OriginalMaintainer,
        Field::Description,
        Field::Changes,
        Field::ChecksumsSha1,
        Field::Url,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Source => "Source",
            Field::Version => "Version",
            Field::Distribution => "Distribution",
            Field::ChangedBy => "Changed-By",
            Field::Maintainer => "Maintainer",
            Field::SignedBy => "Signed-By",
            Field::Date => "Date",
            Field::Architecture => "Architecture",
            Field::Binary => "Binary",
            Field::Format => "Format",
            Field::Urgency => "Urgency",
            Field::OriginalMaintainer => "Original-Maintainer",
            Field::Description => "Description",
            Field::Changes => "Changes",
            Field::ChecksumsSha1 => "Checksums-Sha1",
            Field::Url => "URL",
        }
    }

    /// Look up a control field by its exact key
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == key)
    }

    /// Whether following non-key lines belong to this field
    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            Field::Description | Field::Changes | Field::ChecksumsSha1
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata of one upload, as much of it as the announcement carried.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadRecord {
    fields: BTreeMap<Field, String>,
}

impl UploadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(|s| s.as_str())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    /// Set a field, replacing the previous value.
    /// Distribution is write-once: the first value seen sticks.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        if field == Field::Distribution && self.contains(Field::Distribution) {
            return;
        }
        self.fields.insert(field, value.into());
    }

    /// Append a continuation line to a multi-line field
    pub fn append_line(&mut self, field: Field, line: &str) {
        let value = self.fields.entry(field).or_default();
        if !value.is_empty() {
            value.push('\n');
        }
        value.push_str(line);
    }

    /// Drop the trailing blank lines continuation values pick up before a boundary
    pub(crate) fn trim_trailing(&mut self) {
        for value in self.fields.values_mut() {
            let len = value.trim_end().len();
            value.truncate(len);
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.get(Field::Source)
    }

    pub fn version(&self) -> Option<&str> {
        self.get(Field::Version)
    }

    pub fn distribution(&self) -> Option<&str> {
        self.get(Field::Distribution)
    }

    pub fn changed_by(&self) -> Option<&str> {
        self.get(Field::ChangedBy)
    }

    pub fn signed_by(&self) -> Option<&str> {
        self.get(Field::SignedBy)
    }

    pub fn maintainer(&self) -> Option<&str> {
        self.get(Field::Maintainer)
    }

    pub fn date(&self) -> Option<&str> {
        self.get(Field::Date)
    }

    /// Author of the upload: Changed-By, or Signed-By when absent
    pub fn uploader(&self) -> Option<&str> {
        self.changed_by().or_else(|| self.signed_by())
    }

    /// A record can only be filed when both Source and Version are known
    pub fn is_keyable(&self) -> bool {
        let present = |v: Option<&str>| v.map(|s| !s.is_empty()).unwrap_or(false);
        present(self.source()) && present(self.version())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn field_lookup() {
        assert_eq!(Field::from_key("Changed-By"), Some(Field::ChangedBy));
        assert_eq!(Field::from_key("Checksums-Sha1"), Some(Field::ChecksumsSha1));
        assert_eq!(Field::from_key("Checksums-Sha256"), None);
        assert_eq!(Field::from_key("changed-by"), None);
        for f in Field::ALL {
            assert_eq!(Field::from_key(f.name()), Some(f));
        }
    }

    #[test]
    fn distribution_is_write_once() {
        let mut r = UploadRecord::new();
        r.set(Field::Distribution, "xenial");
        r.set(Field::Distribution, "xenial-proposed");
        assert_eq!(r.distribution(), Some("xenial"));
        r.set(Field::Version, "1.0");
        r.set(Field::Version, "1.1");
        assert_eq!(r.version(), Some("1.1"));
    }

    #[test]
    fn append_joins_with_newline() {
        let mut r = UploadRecord::new();
        r.set(Field::Changes, "");
        r.append_line(Field::Changes, " foo (1.0) xenial; urgency=medium");
        r.append_line(Field::Changes, " .");
        assert_eq!(
            r.get(Field::Changes),
            Some(" foo (1.0) xenial; urgency=medium\n .")
        );
    }

    #[test]
    fn uploader_falls_back_to_signer() {
        let mut r = UploadRecord::new();
        r.set(Field::SignedBy, "Carol <c@x.com>");
        assert_eq!(r.uploader(), Some("Carol <c@x.com>"));
        r.set(Field::ChangedBy, "Alice <a@x.com>");
        assert_eq!(r.uploader(), Some("Alice <a@x.com>"));
    }

    #[test]
    fn keyable_needs_source_and_version() {
        let mut r = UploadRecord::new();
        r.set(Field::Source, "foo");
        assert!(!r.is_keyable());
        r.set(Field::Version, "");
        assert!(!r.is_keyable());
        r.set(Field::Version, "1.0");
        assert!(r.is_keyable());
    }
}
