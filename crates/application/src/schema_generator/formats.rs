use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

// optional scheme, optional userinfo, dot-delimited host, optional port and path
static URL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[a-zA-Z][a-zA-Z0-9+.-]*://)?(?:[^\s/?#@]+@)?[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)+(?::\d{1,5})?(?:[/?#]\S*)?$",
    )
    .ok()
});

static DATE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok());

static DATE_TIME_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[ T]\d{2}:\d{2}(?::\d{2})?$").ok());

static COLOR_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").ok());

fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    LazyLock::force(pattern)
        .as_ref()
        .is_none_or(|expression| expression.is_match(text))
}

pub(super) fn is_email(text: &str) -> bool {
    matches(&EMAIL_RE, text)
}

pub(super) fn is_url(text: &str) -> bool {
    matches(&URL_RE, text)
}

pub(super) fn is_date(text: &str) -> bool {
    matches(&DATE_RE, text) && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

pub(super) fn is_date_time(text: &str) -> bool {
    matches(&DATE_TIME_RE, text)
        && text
            .get(..10)
            .is_some_and(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok())
}

pub(super) fn is_color(text: &str) -> bool {
    matches(&COLOR_RE, text)
}
