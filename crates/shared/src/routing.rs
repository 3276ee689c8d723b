//! Page routes for constituency records.
//!
//! Actionable records (Outdated or Missing) address the Action Hub and carry
//! everything the hub needs as query parameters. Reported records address the
//! dashboard by slug only; the report itself is fetched before rendering.

use thiserror::Error;
use url::Url;

use crate::domain::{ConstituencyRecord, TransparencyStatus};

const ROUTE_BASE: &str = "http://route.local/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ActionHub(ActionRoute),
    Dashboard { slug: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRoute {
    pub slug: String,
    pub constituency_name: String,
    pub mp_name: String,
    pub mp_email: Option<String>,
    pub status: TransparencyStatus,
    pub last_date: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid route '{0}'")]
    Invalid(String),
    #[error("page not found")]
    NotFound,
}

/// Lower-cases the name and collapses whitespace runs into `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Turns a slug back into a display name: `example-north` -> `Example North`.
pub fn display_name_from_slug(slug: &str) -> String {
    let spaced = slug.replace('-', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.chars() {
        if at_word_start && is_word_char(ch) {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !is_word_char(ch);
    }
    out
}

/// Name the dashboard endpoint expects for a slug.
pub fn dashboard_lookup_name(slug: &str) -> String {
    slug.replace('-', " ")
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

impl ConstituencyRecord {
    pub fn slug(&self) -> String {
        slugify(&self.constituency_name)
    }

    pub fn route(&self) -> Route {
        if self.transparency_status.is_actionable() {
            Route::ActionHub(ActionRoute {
                slug: self.slug(),
                constituency_name: self.constituency_name.clone(),
                mp_name: self.mp_name.clone(),
                mp_email: self.mp_email.clone().filter(|email| !email.is_empty()),
                status: self.transparency_status,
                last_date: self.last_report_date.map(|date| date.to_string()),
            })
        } else {
            Route::Dashboard { slug: self.slug() }
        }
    }
}

impl Route {
    pub fn to_path(&self) -> String {
        match self {
            Self::ActionHub(route) => route.to_path(),
            Self::Dashboard { slug } => format!("/dashboard/{slug}"),
        }
    }

    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let url = parse_relative(path)?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        match segments.as_slice() {
            ["action", _] => ActionRoute::from_url(&url).map(Self::ActionHub),
            ["dashboard", slug] => Ok(Self::Dashboard {
                slug: decode_segment(slug),
            }),
            _ => Err(RouteError::NotFound),
        }
    }
}

impl ActionRoute {
    pub fn to_path(&self) -> String {
        format!(
            "/action/{}?mp={}&email={}&status={}&lastDate={}",
            self.slug,
            urlencoding::encode(&self.mp_name),
            urlencoding::encode(self.mp_email.as_deref().unwrap_or_default()),
            urlencoding::encode(self.status.as_str()),
            urlencoding::encode(self.last_date.as_deref().unwrap_or_default()),
        )
    }

    /// Resolves an Action Hub path. Missing `mp`/`status`, or a status that is
    /// not actionable, resolve to [`RouteError::NotFound`].
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        match Route::parse(path)? {
            Route::ActionHub(route) => Ok(route),
            Route::Dashboard { .. } => Err(RouteError::NotFound),
        }
    }

    fn from_url(url: &Url) -> Result<Self, RouteError> {
        let slug = url
            .path_segments()
            .and_then(|mut segments| segments.nth(1))
            .map(decode_segment)
            .filter(|slug| !slug.is_empty())
            .ok_or(RouteError::NotFound)?;

        let mut mp_name = None;
        let mut mp_email = None;
        let mut status = None;
        let mut last_date = None;
        for (key, value) in url.query_pairs() {
            let value = value.into_owned();
            match key.as_ref() {
                "mp" => mp_name = Some(value),
                "email" => mp_email = Some(value),
                "status" => status = Some(value),
                "lastDate" => last_date = Some(value),
                _ => {}
            }
        }

        let mp_name = mp_name
            .filter(|name| !name.is_empty())
            .ok_or(RouteError::NotFound)?;
        let status = status
            .and_then(|raw| raw.parse::<TransparencyStatus>().ok())
            .filter(|status| status.is_actionable())
            .ok_or(RouteError::NotFound)?;

        Ok(Self {
            constituency_name: display_name_from_slug(&slug),
            slug,
            mp_name,
            mp_email: mp_email.filter(|email| !email.is_empty()),
            status,
            last_date: last_date.filter(|date| !date.is_empty()),
        })
    }
}

fn parse_relative(path: &str) -> Result<Url, RouteError> {
    let base = Url::parse(ROUTE_BASE).map_err(|err| RouteError::Invalid(err.to_string()))?;
    base.join(path)
        .map_err(|_| RouteError::Invalid(path.to_string()))
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
