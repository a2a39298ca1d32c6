//! Turn one upload announcement into an [`UploadRecord`].
//!
//! Announcements are multipart messages: a short summary written by the
//! archive, followed by a `changesfile` attachment with the signed
//! `.changes` control text. Both are read as a single stream of lines.
mod fields;
mod summary;

use crate::{
    debug,
    types::{Field, UploadRecord},
};

use mail_parser::{Message, MessageParser};
use std::borrow::Cow;

/// Placeholder the archive puts in place of the attachment when it lost the file
const CHANGESFILE_UNAVAILABLE: &str = "changesfile not available";

/// Which uploads the caller cares about. Empty lists accept everything.
#[derive(Clone, Debug, Default)]
pub struct Filters {
    pub emails: Vec<String>,
    pub packages: Vec<String>,
}

impl Filters {
    pub fn new(emails: Vec<String>, packages: Vec<String>) -> Self {
        Filters { emails, packages }
    }

    pub fn accepts(&self, record: &UploadRecord) -> bool {
        if !self.emails.is_empty() {
            let uploader = match record.uploader() {
                Some(u) => u,
                None => return false,
            };
            if !self.emails.iter().any(|e| uploader.contains(e.as_str())) {
                return false;
            }
        }
        if !self.packages.is_empty() {
            let source = record.source().unwrap_or_default();
            if !self.packages.iter().any(|p| p == source) {
                return false;
            }
        }
        true
    }
}

/// Extract an upload record out of a raw message.
///
/// Returns `None` when the message is not an upload announcement, lacks
/// Source or Version, or is rejected by `filters`.
pub fn extract(message: &str, filters: &Filters) -> Option<UploadRecord> {
    let raw = strip_envelope(message);
    let parsed = MessageParser::default().parse(raw)?;
    let (base, changes) = match announcement_bodies(&parsed) {
        Some(bodies) => bodies,
        None => {
            debug!("Skipping message without announcement parts");
            return None;
        }
    };

    let mut record = UploadRecord::new();
    let mut base_lines = base.lines().peekable();
    if let Some(first) = base_lines.peek() {
        if let Ok((_, s)) = summary::parse_summary(first.trim()) {
            record.set(Field::Source, s.source);
            record.set(Field::Version, s.version);
            record.set(Field::Distribution, s.distribution);
            // The summary line and the blank line after it
            base_lines.next();
            base_lines.next();
        }
    }

    let changes_available = !changes.to_lowercase().contains(CHANGESFILE_UNAVAILABLE);
    if changes_available {
        fields::collect(base_lines.chain(changes.lines()), &mut record);
    } else {
        fields::collect(base_lines, &mut record);
    }

    if !record.is_keyable() {
        debug!("Skipping announcement without Source or Version");
        return None;
    }
    if !filters.accepts(&record) {
        debug!(
            "Filtered out {} {}",
            record.source().unwrap_or_default(),
            record.version().unwrap_or_default()
        );
        return None;
    }
    Some(record)
}

/// Drop the mbox `From ` separator line, it is not a header
fn strip_envelope(message: &str) -> &str {
    if message.starts_with("From ") {
        match message.find('\n') {
            Some(pos) => &message[pos + 1..],
            None => "",
        }
    } else {
        message
    }
}

/// Find the first multipart container with exactly two children: the
/// summary and the changesfile.
fn announcement_bodies<'a>(message: &'a Message<'a>) -> Option<(Cow<'a, str>, Cow<'a, str>)> {
    for part in message.parts.iter() {
        let children = match part.sub_parts() {
            Some(children) if children.len() == 2 => children,
            _ => continue,
        };
        let base = message.parts.get(children[0] as usize)?;
        let changes = message.parts.get(children[1] as usize)?;
        return Some((
            String::from_utf8_lossy(base.contents()),
            String::from_utf8_lossy(changes.contents()),
        ));
    }
    None
}
