//! Regroup a [`History`] into per-uploader tables.
//!
//! The history is keyed by uploader, package and version. The report
//! additionally splits every uploader's uploads by distribution, keeping
//! the distributions in the order they appear in the archive.
mod table;
pub use table::render;

use crate::{history::History, types::UploadRecord};

use chrono::{DateTime, NaiveDate};
use tabled::Tabled;

/// Heading used for uploads that carried no Changed-By
pub const UNKNOWN_UPLOADER: &str = "Unknown uploader";

#[derive(Tabled, Clone, Debug, PartialEq, Eq)]
pub struct UploadRow {
    #[header("Package Name")]
    pub package: String,
    #[header("Version")]
    pub version: String,
    #[header("Publish Date")]
    pub date: String,
    #[header("Uploader")]
    pub uploader: String,
    #[header("Sponsor")]
    pub sponsor: String,
}

impl UploadRow {
    pub const HEADERS: [&'static str; 5] =
        ["Package Name", "Version", "Publish Date", "Uploader", "Sponsor"];

    pub fn cells(&self) -> [&str; 5] {
        [
            self.package.as_str(),
            self.version.as_str(),
            self.date.as_str(),
            self.uploader.as_str(),
            self.sponsor.as_str(),
        ]
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Section {
    pub distribution: String,
    pub rows: Vec<UploadRow>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UploaderReport {
    pub uploader: String,
    pub sections: Vec<Section>,
}

pub struct ReportOptions<'a> {
    pub automation_addresses: &'a [String],
    pub created_after: Option<NaiveDate>,
}

/// Who is responsible for an upload besides its author:
/// the signer, else a maintainer that is not a bot, else the author.
pub fn sponsor<'a, S: AsRef<str>>(record: &'a UploadRecord, automation: &[S]) -> Option<&'a str> {
    if let Some(signer) = record.signed_by() {
        return Some(signer);
    }
    if let Some(maintainer) = record.maintainer() {
        if !automation.iter().any(|a| maintainer.contains(a.as_ref())) {
            return Some(maintainer);
        }
    }
    record.changed_by()
}

/// Uploads without a parseable date are never filtered out
fn published_before(record: &UploadRecord, day: NaiveDate) -> bool {
    record
        .date()
        .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
        .map(|d| d.date_naive() < day)
        .unwrap_or(false)
}

pub fn build(history: &History, opts: &ReportOptions) -> Vec<UploaderReport> {
    let mut reports: Vec<(Option<&str>, UploaderReport)> = Vec::new();

    for (key, record) in history.in_archive_order() {
        if let Some(day) = opts.created_after {
            if published_before(record, day) {
                continue;
            }
        }

        let uploader = key.uploader.as_deref();
        let pos = match reports.iter().position(|(u, _)| *u == uploader) {
            Some(pos) => pos,
            None => {
                reports.push((
                    uploader,
                    UploaderReport {
                        uploader: uploader.unwrap_or(UNKNOWN_UPLOADER).to_owned(),
                        sections: Vec::new(),
                    },
                ));
                reports.len() - 1
            }
        };
        let report = &mut reports[pos].1;

        let distribution = record.distribution().unwrap_or_default();
        let section = match report
            .sections
            .iter()
            .position(|s| s.distribution == distribution)
        {
            Some(i) => &mut report.sections[i],
            None => {
                report.sections.push(Section {
                    distribution: distribution.to_owned(),
                    rows: Vec::new(),
                });
                // Just pushed
                let last = report.sections.len() - 1;
                &mut report.sections[last]
            }
        };

        section.rows.push(UploadRow {
            package: key.package.clone(),
            version: key.version.clone(),
            date: record.date().unwrap_or_default().to_owned(),
            uploader: record.uploader().unwrap_or_default().to_owned(),
            sponsor: sponsor(record, opts.automation_addresses)
                .unwrap_or_default()
                .to_owned(),
        });
    }

    let mut res: Vec<_> = reports.into_iter().map(|(_, r)| r).collect();
    res.sort_by(|a, b| a.uploader.cmp(&b.uploader));
    for report in res.iter_mut() {
        for section in report.sections.iter_mut() {
            section
                .rows
                .sort_by(|a, b| (&a.package, &a.version).cmp(&(&b.package, &b.version)));
        }
    }
    res
}
