/// Parse the first line of an upload announcement, like `foo (1.0-1) xenial; urgency=medium`
use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{alphanumeric1, char, space1},
    combinator::recognize,
    sequence::{delimited, pair},
    IResult,
};

#[derive(Debug, PartialEq, Eq)]
pub struct Summary<'a> {
    pub source: &'a str,
    pub version: &'a str,
    pub distribution: &'a str,
}

// parser combinators
fn parse_package_name(s: &str) -> IResult<&str, &str> {
    recognize(pair(
        alphanumeric1,
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'),
    ))(s)
}

fn parse_version(s: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.' || c == '~' || c == ':'
    })(s)
}

fn parse_distribution(s: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '.')(s)
}

/// Returns the rest of the line after the `;`
pub fn parse_summary(s: &str) -> IResult<&str, Summary> {
    let (i, source) = parse_package_name(s)?;
    let (i, _) = space1(i)?;
    let (i, version) = delimited(char('('), parse_version, char(')'))(i)?;
    let (i, _) = space1(i)?;
    let (i, distribution) = parse_distribution(i)?;
    let (i, _) = char(';')(i)?;

    Ok((
        i,
        Summary {
            source,
            version,
            distribution,
        },
    ))
}

#[test]
fn test_parsers() {
    assert_eq!(
        parse_package_name("cloud-init (0.7.7)"),
        Ok((" (0.7.7)", "cloud-init"))
    );
    assert_eq!(parse_version("1:2.3~rc1-0ubuntu1)"), Ok((")", "1:2.3~rc1-0ubuntu1")));
    assert_eq!(
        parse_summary("foo (1.0) xenial; urgency=medium"),
        Ok((
            " urgency=medium",
            Summary {
                source: "foo",
                version: "1.0",
                distribution: "xenial"
            }
        ))
    );
    assert_eq!(
        parse_summary("libvirt (1.3.1-1ubuntu10.1) xenial-proposed;")
            .unwrap()
            .1
            .distribution,
        "xenial-proposed"
    );
    assert!(parse_summary("Accepted foo into xenial").is_err());
    assert!(parse_summary("foo 1.0 xenial;").is_err());
    assert!(parse_summary("foo (1.0) xenial urgency=low").is_err());
}
