/// Collect control fields out of the loosely formatted announcement body
use crate::types::{Field, UploadRecord};

use lazy_static::lazy_static;
use regex::Regex;

/// Nothing after the signature block belongs to the upload
pub const SIGNATURE_BOUNDARY: &str = "-----BEGIN PGP SIGNATURE-----";

lazy_static! {
    static ref KEY_LINE: Regex = Regex::new(r"^([^\s:]+):(.*)$").unwrap();
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// A recognized `Key: value` line
    Key(Field, &'a str),
    /// Something like `https://launchpad.net/...`
    Url,
    Continuation,
    Boundary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Active(Field),
}

fn classify(line: &str) -> Line {
    if line.contains(SIGNATURE_BOUNDARY) {
        return Line::Boundary;
    }
    let caps = match KEY_LINE.captures(line) {
        Some(caps) => caps,
        None => return Line::Continuation,
    };
    // Both groups always participate in a match
    let key = caps.get(1).map_or("", |m| m.as_str());
    let rest = caps.get(2).map_or("", |m| m.as_str());
    if key.contains("http") {
        Line::Url
    } else if let Some(field) = Field::from_key(key) {
        Line::Key(field, rest.trim())
    } else {
        Line::Continuation
    }
}

/// Walk the lines top to bottom and fill the record.
/// Stops at the first signature boundary.
pub fn collect<'a>(lines: impl IntoIterator<Item = &'a str>, record: &mut UploadRecord) {
    let mut state = State::Idle;
    for line in lines {
        state = match (classify(line), state) {
            (Line::Boundary, _) => break,
            (Line::Url, _) => {
                record.set(Field::Url, line);
                State::Idle
            }
            (Line::Key(field, value), _) => {
                record.set(field, value);
                if field.is_multiline() {
                    State::Active(field)
                } else {
                    State::Idle
                }
            }
            (Line::Continuation, State::Active(field)) => {
                record.append_line(field, line);
                State::Active(field)
            }
            (Line::Continuation, State::Idle) => State::Idle,
        };
    }
    record.trim_trailing();
}
