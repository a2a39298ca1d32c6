use crate::{
    archive,
    config::{Config, Opts, OutputStyle},
    debug,
    extract::Filters,
    history, info,
    report::{self, ReportOptions},
    warn,
};

use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::{io::Write, path::Path};

#[derive(Debug, PartialEq, Eq)]
pub enum SeriesOutcome {
    /// The archive has not been downloaded yet
    Missing { url: String, path: String },
    /// Number of uploaders reported
    Reported(usize),
}

pub struct Request<'a> {
    pub base_dir: &'a Path,
    pub filters: Filters,
    pub created_after: Option<NaiveDate>,
    pub style: OutputStyle,
}

impl<'a> Request<'a> {
    pub fn from_opts(opts: &'a Opts) -> Self {
        Request {
            base_dir: &opts.base_dir,
            filters: Filters::new(opts.emails.clone(), opts.package.iter().cloned().collect()),
            created_after: opts.created_after,
            style: opts.style,
        }
    }
}

/// Read, fold and print the archive of one series.
/// Nothing is written to `out` before the whole archive has been read.
pub fn report_series(
    config: &Config,
    req: &Request,
    series: &str,
    out: &mut dyn Write,
) -> Result<SeriesOutcome> {
    let reader = match archive::open(req.base_dir, series)? {
        Some(reader) => reader,
        None => {
            return Ok(SeriesOutcome::Missing {
                url: archive::download_url(&config.archive_url, series),
                path: archive::archive_path(req.base_dir, series)
                    .display()
                    .to_string(),
            })
        }
    };

    info!("Reading uploads to {}...", series);
    let history = history::aggregate(reader, &req.filters)?;
    if history.is_empty() {
        debug!("No uploads kept in {}", series);
    }
    for (uploader, packages) in history.nested() {
        debug!(
            "{}: {} packages",
            uploader.unwrap_or(report::UNKNOWN_UPLOADER),
            packages.len()
        );
    }

    let reports = report::build(
        &history,
        &ReportOptions {
            automation_addresses: &config.automation_addresses,
            created_after: req.created_after,
        },
    );
    report::render(&reports, req.style, out)?;
    Ok(SeriesOutcome::Reported(reports.len()))
}

pub fn run(config: &Config, opts: &Opts, out: &mut dyn Write) -> Result<()> {
    if !opts.base_dir.is_dir() {
        bail!("{} is not a directory", opts.base_dir.display());
    }

    let req = Request::from_opts(opts);
    for series in opts.series(config) {
        match report_series(config, &req, &series, out)? {
            SeriesOutcome::Missing { url, path } => {
                warn!("Archive for {} not found, please download {} to {}", series, url, path);
            }
            SeriesOutcome::Reported(0) => info!("No matching uploads in {}", series),
            SeriesOutcome::Reported(_) => (),
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::extract::test::upload;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("upload-history-{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn request(dir: &Path, style: OutputStyle) -> Request {
        Request {
            base_dir: dir,
            filters: Filters::default(),
            created_after: None,
            style,
        }
    }

    #[test]
    fn missing_series_gives_download_hint() {
        let dir = scratch_dir("missing");
        let mut out = Vec::new();
        let outcome = report_series(
            &Config::default(),
            &request(&dir, OutputStyle::Markdown),
            "yakkety",
            &mut out,
        )
        .unwrap();
        match outcome {
            SeriesOutcome::Missing { url, path } => {
                assert_eq!(
                    url,
                    "https://lists.ubuntu.com/archives/yakkety-changes.mbox/yakkety-changes.mbox"
                );
                assert!(path.ends_with("yakkety-changes.mbox"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn present_series_is_reported() {
        let dir = scratch_dir("present");
        let mbox = [
            upload("foo", "1.0", "Alice <a@x.com>"),
            upload("foo", "2.0", "Alice <a@x.com>"),
        ]
        .concat();
        std::fs::write(dir.join("xenial-changes.mbox"), mbox).unwrap();

        let mut out = Vec::new();
        let outcome = report_series(
            &Config::default(),
            &request(&dir, OutputStyle::Markdown),
            "xenial",
            &mut out,
        )
        .unwrap();
        assert_eq!(outcome, SeriesOutcome::Reported(1));
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("## Alice <a@x.com>\n"));
        assert!(text.contains("| foo | 1.0 |"));
        assert!(text.contains("| foo | 2.0 |"));
        assert!(text.contains("Sponsor Person <sponsor@example.com>"));
    }

    #[test]
    fn missing_base_dir_is_fatal() {
        let dir = scratch_dir("base").join("does-not-exist");
        let opts = <Opts as clap::Parser>::parse_from([
            "upload-history".to_string(),
            "--base-dir".to_string(),
            dir.display().to_string(),
        ]);
        let mut out = Vec::new();
        assert!(run(&Config::default(), &opts, &mut out).is_err());
    }
}
