use std::ops::Range;
use std::str::FromStr;

use miette::Diagnostic;
use miette::NamedSource;
use miette::SourceSpan;
use reqwest::Method;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::parser::Catalog;
use crate::parser::Test;

// Error messages for parsing URLs
const BASE_URL_ENDS_WITH: &str =
    "The base URL from setup can't end with a /, and each URL in a test must start with one";
const PATH_URL_MISSING_SLASH: &str =
    "The URL field in a test is required to begin with a leading /.";

pub struct Validator {
    catalog: Catalog,
    toml_src: String,
    file_name: String,
}

/// Validated catalog, ready to run.
#[derive(Debug, Clone)]
pub struct IR {
    pub base_url: String,
    pub tests: Vec<TestCase>,
}

#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
    pub expected_status: StatusCode,
}

#[derive(Debug, Error, Diagnostic)]
#[error("Invalid field `{field}`: {message}")]
pub struct ValidationError {
    field: String,
    message: String,
    #[source_code]
    src: Option<NamedSource<String>>,
    #[label("invalid value here")]
    span: Option<SourceSpan>,
}

macro_rules! validation_err {
    ($field:expr, $msg:expr, $self:expr, $spanned:expr) => {
        ValidationError {
            field: $field.to_string(),
            message: $msg.to_string(),
            src: Some(NamedSource::new(
                $self.file_name.clone(),
                $self.toml_src.clone(),
            )),
            span: Some(source_span($spanned.span())),
        }
    };
}

fn source_span(range: Range<usize>) -> SourceSpan {
    SourceSpan::new(range.start.into(), range.end - range.start)
}

impl Validator {
    pub fn new(catalog: &Catalog, toml_src: &str, file_name: &str) -> Self {
        Self {
            catalog: catalog.clone(),
            toml_src: toml_src.into(),
            file_name: file_name.into(),
        }
    }

    pub fn validate(&self) -> miette::Result<IR, ValidationError> {
        let base_url = &self.catalog.setup.base_url;

        if base_url.get_ref().ends_with('/') {
            return Err(validation_err!(
                "setup.base_url",
                BASE_URL_ENDS_WITH,
                self,
                base_url
            ));
        }

        let tests = self
            .catalog
            .tests
            .iter()
            .map(|test| self.create_test(test))
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(IR {
            base_url: base_url.get_ref().clone(),
            tests,
        })
    }

    fn create_test(&self, test: &Test) -> Result<TestCase, ValidationError> {
        let name = test.name.get_ref();

        if name.trim().is_empty() {
            return Err(validation_err!(
                "tests.name",
                "A test needs a non-empty name",
                self,
                test.name
            ));
        }

        let method = parse_method(test.method.get_ref())
            .map_err(|e| validation_err!(format!("{name} - method"), e, self, test.method))?;

        let base_url = &self.catalog.setup.base_url;
        let url = parse_url(base_url.get_ref(), test.url.get_ref()).map_err(|e| match e {
            ParseUrlError::PathUrlMissingSlash => validation_err!(
                format!("{name} - url"),
                PATH_URL_MISSING_SLASH,
                self,
                test.url
            ),
            ParseUrlError::ParseIntoUrlFailed(parse_error) => validation_err!(
                format!("{name} - url"),
                format!("Failed to parse URL: {parse_error}"),
                self,
                base_url
            ),
        })?;

        let expected_status = parse_status(*test.assert_status.get_ref()).map_err(|e| {
            validation_err!(
                format!("{name} - assert_status"),
                e,
                self,
                test.assert_status
            )
        })?;

        Ok(TestCase {
            name: name.clone(),
            method,
            url,
            body: test.body.clone(),
            expected_status,
        })
    }
}

#[derive(Debug, Error)]
enum ParseUrlError {
    #[error("missing leading slash")]
    PathUrlMissingSlash,
    #[error("Failed to parse URL: {0}")]
    ParseIntoUrlFailed(#[from] url::ParseError),
}

fn parse_url(base_url: &str, path_url: &str) -> Result<Url, ParseUrlError> {
    if !path_url.starts_with('/') {
        return Err(ParseUrlError::PathUrlMissingSlash);
    }

    let url = Url::parse(&format!("{base_url}{path_url}"))?;

    Ok(url)
}

fn parse_method(method: &str) -> Result<Method, String> {
    let method = Method::from_str(&method.to_uppercase()).map_err(|e| e.to_string())?;

    if !matches!(
        method,
        Method::GET
            | Method::POST
            | Method::PUT
            | Method::DELETE
            | Method::PATCH
            | Method::HEAD
            | Method::OPTIONS
            | Method::CONNECT
            | Method::TRACE
    ) {
        return Err(format!("Invalid HTTP method: {method}"));
    }

    Ok(method)
}

fn parse_status(status: i32) -> Result<StatusCode, String> {
    u16::try_from(status)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .ok_or_else(|| format!("{status} is not a valid HTTP status code"))
}
