//! Query string -> `RenderConfig`.
//!
//! Only the action URL can fail a request. Every cosmetic parameter that is
//! missing or malformed quietly falls back to its default.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::fonts::{FontFamily, FontStyle};
use crate::{Error, Result};

pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 169;

pub const DEFAULT_BACKGROUND: &str = "transparent";
pub const DEFAULT_BAR_BACKGROUND: &str = "#000000";
pub const DEFAULT_BAR_FILL: &str = "#826BA3";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

const INVALID_URL: &str = "Invalid url";
const UNSUPPORTED_SCHEME: &str = "URL must start with http:// or https://";
const NODE_PATH_REQUIRED: &str =
    "URL must end in /node/ followed by a number, eg `https://action.earthcharity.org.uk/node/123`";

static NODE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/node/\d+/?$").expect("node path pattern is valid"));
static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("hex colour pattern is valid")
});

/// Decoded query parameters. The first occurrence of a key wins.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let mut values = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            values
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// CSS colour strings for each layer, passed to the renderer unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Colors {
    pub background: String,
    pub bar_background: String,
    pub bar_fill: String,
    pub text: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            bar_background: DEFAULT_BAR_BACKGROUND.to_string(),
            bar_fill: DEFAULT_BAR_FILL.to_string(),
            text: DEFAULT_TEXT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSelection {
    pub family: FontFamily,
    pub style: FontStyle,
    pub weight: u16,
}

impl FontSelection {
    pub fn new(family: FontFamily, style: FontStyle) -> Self {
        let style = if family.supports(style) {
            style
        } else {
            FontStyle::Normal
        };
        Self {
            family,
            style,
            weight: style.weight(),
        }
    }
}

impl Default for FontSelection {
    fn default() -> Self {
        Self::new(FontFamily::default(), FontStyle::default())
    }
}

/// Everything needed to render one image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub action_url: Url,
    /// The `url` parameter exactly as supplied, for messages back to the caller
    pub requested_url: String,
    pub dimensions: Dimensions,
    pub colors: Colors,
    pub font: FontSelection,
    /// Raw text template; `None` renders the default sentence.
    pub text: Option<String>,
}

/// Resolve all query parameters into a `RenderConfig`.
pub fn resolve(params: &QueryParams) -> Result<RenderConfig> {
    let (action_url, requested_url) = match params.get("url") {
        None | Some("") => return Err(Error::MissingParameter),
        Some(raw) => (validate_action_url(raw)?, raw.to_string()),
    };

    let dimensions = Dimensions {
        width: resolve_dimension(params.get("width"), DEFAULT_WIDTH),
        height: resolve_dimension(params.get("height"), DEFAULT_HEIGHT),
    };

    let colors = Colors {
        background: resolve_color(params.get("bg"), DEFAULT_BACKGROUND),
        bar_background: resolve_color(params.get("bar_bg"), DEFAULT_BAR_BACKGROUND),
        bar_fill: resolve_color(params.get("bar"), DEFAULT_BAR_FILL),
        text: resolve_color(params.get("text_colour"), DEFAULT_TEXT_COLOR),
    };

    let family = params
        .get("font")
        .and_then(FontFamily::from_id)
        .unwrap_or_default();
    // `weight` selects a style, e.g. `normal`
    let style = params
        .get("weight")
        .and_then(FontStyle::from_id)
        .unwrap_or_default();

    Ok(RenderConfig {
        action_url,
        requested_url,
        dimensions,
        colors,
        font: FontSelection::new(family, style),
        text: params.get("text").map(str::to_string),
    })
}

/// Check that `raw` is an absolute http(s) URL ending in `/node/<digits>`.
/// All failed checks are reported together.
pub fn validate_action_url(raw: &str) -> Result<Url> {
    let mut issues = Vec::new();

    let parsed = match Url::parse(raw.trim()) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                issues.push(UNSUPPORTED_SCHEME);
            }
            if !NODE_PATH.is_match(url.path()) {
                issues.push(NODE_PATH_REQUIRED);
            }
            Some(url)
        }
        Err(_) => {
            issues.push(INVALID_URL);
            if !NODE_PATH.is_match(raw.trim()) {
                issues.push(NODE_PATH_REQUIRED);
            }
            None
        }
    };

    match parsed {
        Some(url) if issues.is_empty() => Ok(url),
        _ => Err(Error::InvalidParameter(issues.join(", "))),
    }
}

/// Parse a pixel dimension. Non-numeric or < 1 falls back to `default`.
pub fn resolve_dimension(raw: Option<&str>, default: u32) -> u32 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.round().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(default)
}

/// Bare hex colours get a `#`; anything else non-empty passes through as a
/// CSS colour name.
pub fn resolve_color(raw: Option<&str>, default: &str) -> String {
    match raw {
        None | Some("") => default.to_string(),
        Some(value) if HEX_COLOR.is_match(value) => format!("#{}", value),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        QueryParams::parse(&query)
    }

    const ACTION: &str = "https://act.youngminds.org.uk/node/136";

    #[test]
    fn only_url_gives_all_defaults() {
        let config = resolve(&params(&[("url", ACTION)])).unwrap();
        assert_eq!(config.action_url.as_str(), ACTION);
        assert_eq!(config.requested_url, ACTION);
        assert_eq!(config.dimensions, Dimensions { width: 300, height: 169 });
        assert_eq!(config.colors, Colors::default());
        assert_eq!(config.colors.background, "transparent");
        assert_eq!(config.colors.bar_fill, "#826BA3");
        assert_eq!(config.font.family, FontFamily::Inter);
        assert_eq!(config.font.style, FontStyle::Normal);
        assert_eq!(config.font.weight, 400);
        assert_eq!(config.text, None);
    }

    #[test]
    fn missing_or_empty_url() {
        assert!(matches!(
            resolve(&QueryParams::default()),
            Err(Error::MissingParameter)
        ));
        assert!(matches!(
            resolve(&params(&[("url", "")])),
            Err(Error::MissingParameter)
        ));
    }

    #[test]
    fn url_without_node_id_is_rejected() {
        let err = validate_action_url("https://example.org/my-action-name").unwrap_err();
        match err {
            Error::InvalidParameter(msg) => assert_eq!(msg, NODE_PATH_REQUIRED),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn url_with_trailing_segment_is_rejected() {
        assert!(validate_action_url("https://action.earthcharity.org.uk/node/136/polling").is_err());
        assert!(validate_action_url("https://action.earthcharity.org.uk/node/abc").is_err());
    }

    #[test]
    fn not_a_url_reports_every_issue() {
        match validate_action_url("not a url").unwrap_err() {
            Error::InvalidParameter(msg) => {
                assert_eq!(msg, format!("{}, {}", INVALID_URL, NODE_PATH_REQUIRED))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // the node rule is the same whether or not the URL parses
        match validate_action_url("not a url/node/1/polling").unwrap_err() {
            Error::InvalidParameter(msg) => {
                assert_eq!(msg, format!("{}, {}", INVALID_URL, NODE_PATH_REQUIRED))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // relative paths are not absolute URLs even if the node pattern matches
        match validate_action_url("/node/136").unwrap_err() {
            Error::InvalidParameter(msg) => assert_eq!(msg, INVALID_URL),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(validate_action_url("ftp://example.org/node/1").is_err());
    }

    #[test]
    fn node_urls_are_accepted() {
        assert!(validate_action_url("https://action.earthcharity.org.uk/node/123").is_ok());
        assert!(validate_action_url("http://127.0.0.1:8080/node/7/").is_ok());
        assert!(validate_action_url("https://act.example.org/en/node/42?utm=x").is_ok());
    }

    #[test]
    fn dimension_coercion() {
        assert_eq!(resolve_dimension(Some("abc"), DEFAULT_WIDTH), 300);
        assert_eq!(resolve_dimension(Some("0"), DEFAULT_WIDTH), 300);
        assert_eq!(resolve_dimension(Some("-20"), DEFAULT_WIDTH), 300);
        assert_eq!(resolve_dimension(Some(""), DEFAULT_HEIGHT), 169);
        assert_eq!(resolve_dimension(None, DEFAULT_HEIGHT), 169);
        assert_eq!(resolve_dimension(Some("150"), DEFAULT_WIDTH), 150);
        assert_eq!(resolve_dimension(Some(" 640 "), DEFAULT_WIDTH), 640);
        assert_eq!(resolve_dimension(Some("1"), DEFAULT_WIDTH), 1);
        assert_eq!(resolve_dimension(Some("99.6"), DEFAULT_WIDTH), 100);
        assert_eq!(resolve_dimension(Some("NaN"), DEFAULT_WIDTH), 300);
        assert_eq!(resolve_dimension(Some("inf"), DEFAULT_WIDTH), 300);
    }

    #[test]
    fn colour_normalisation() {
        assert_eq!(resolve_color(Some("ff5f00"), DEFAULT_BAR_FILL), "#ff5f00");
        assert_eq!(resolve_color(Some("FFF"), DEFAULT_BAR_FILL), "#FFF");
        assert_eq!(resolve_color(Some("zz5f00"), DEFAULT_BAR_FILL), "zz5f00");
        assert_eq!(resolve_color(Some("rebeccapurple"), DEFAULT_BAR_FILL), "rebeccapurple");
        assert_eq!(resolve_color(Some("ff5f0"), DEFAULT_BAR_FILL), "ff5f0");
        assert_eq!(resolve_color(Some(""), DEFAULT_BAR_FILL), "#826BA3");
        assert_eq!(resolve_color(None, DEFAULT_BACKGROUND), "transparent");
    }

    #[test]
    fn colours_map_to_their_slots() {
        let config = resolve(&params(&[
            ("url", ACTION),
            ("bg", "f8fafc"),
            ("bar", "FF5F00"),
            ("bar_bg", "CDCFD0"),
            ("text_colour", "191919"),
        ]))
        .unwrap();
        assert_eq!(config.colors.background, "#f8fafc");
        assert_eq!(config.colors.bar_fill, "#FF5F00");
        assert_eq!(config.colors.bar_background, "#CDCFD0");
        assert_eq!(config.colors.text, "#191919");
    }

    #[test]
    fn requested_url_is_kept_verbatim() {
        let raw = "HTTP://Act.Example.ORG/node/9";
        let config = resolve(&params(&[("url", raw)])).unwrap();
        assert_eq!(config.requested_url, raw);
        assert_eq!(config.action_url.as_str(), "http://act.example.org/node/9");
    }

    #[test]
    fn font_and_style_fall_back() {
        let config = resolve(&params(&[("url", ACTION), ("font", "merriweather")])).unwrap();
        assert_eq!(config.font.family, FontFamily::Merriweather);

        let config = resolve(&params(&[
            ("url", ACTION),
            ("font", "wingdings"),
            ("weight", "bold"),
        ]))
        .unwrap();
        assert_eq!(config.font, FontSelection::default());
    }

    #[test]
    fn query_string_parsing_keeps_first_value_and_decodes() {
        let query = QueryParams::parse(
            "url=https%3A%2F%2Fexample.org%2Fnode%2F1&width=10&width=20&text=Total%20is%20%7Btotal%7D",
        );
        assert_eq!(query.get("url"), Some("https://example.org/node/1"));
        assert_eq!(query.get("width"), Some("10"));
        assert_eq!(query.get("text"), Some("Total is {total}"));
        assert_eq!(query.get("missing"), None);
    }
}
