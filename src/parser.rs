use serde::Deserialize;
use toml::Spanned;

/// Name the embedded catalog is reported under in diagnostics.
pub const CATALOG_FILE: &str = "catalog.toml";

/// The smoke test catalog compiled into the binary.
pub const EMBEDDED_CATALOG: &str = include_str!("catalog.toml");

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub setup: Setup,
    #[serde(default)]
    pub tests: Vec<Test>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Setup {
    pub base_url: Spanned<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Test {
    pub name: Spanned<String>,
    pub method: Spanned<String>,
    pub url: Spanned<String>,
    pub body: Option<serde_json::Value>,
    pub assert_status: Spanned<i32>,
}

impl Catalog {
    pub fn from_toml(src: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(src)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = Catalog::from_toml(EMBEDDED_CATALOG).unwrap();

        assert_eq!(catalog.setup.base_url.get_ref(), "http://localhost:3000");
        assert_eq!(catalog.tests.len(), 2);

        let health = &catalog.tests[0];
        assert_eq!(health.name.get_ref(), "GET /health");
        assert_eq!(health.method.get_ref(), "GET");
        assert_eq!(health.url.get_ref(), "/health");
        assert!(health.body.is_none());
        assert_eq!(*health.assert_status.get_ref(), 200);

        let login = &catalog.tests[1];
        assert_eq!(login.name.get_ref(), "POST /login");
        assert_eq!(login.method.get_ref(), "POST");
        assert_eq!(
            login.body,
            Some(json!({ "username": "test", "password": "test" }))
        );
        assert_eq!(*login.assert_status.get_ref(), 200);
    }

    #[test]
    fn fields_keep_their_source_position() {
        let catalog = Catalog::from_toml(EMBEDDED_CATALOG).unwrap();
        let login = &catalog.tests[1];

        let method = &EMBEDDED_CATALOG[login.method.span()];
        assert_eq!(method.trim_matches('"'), "POST");

        let method_line = EMBEDDED_CATALOG.find("method = \"POST\"").unwrap();
        assert!(login.method.span().start > method_line);
        assert!(login.name.span().end < method_line);
    }

    #[test]
    fn missing_tests_table_is_an_empty_catalog() {
        let catalog = Catalog::from_toml("[setup]\nbase_url = \"http://localhost:3000\"\n").unwrap();
        assert!(catalog.tests.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let src = r#"
[setup]
base_url = "http://localhost:3000"

[[tests]]
name = "GET /health"
method = "GET"
url = "/health"
assert_status = 200
assert_headers = { "content-type" = "text/plain" }
"#;
        assert!(Catalog::from_toml(src).is_err());
    }
}
