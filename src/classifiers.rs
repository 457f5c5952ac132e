//! Token classifiers for single markdown lines.
//!
//! Each classifier wraps one compiled pattern and answers "does this line
//! (or already-extracted URL) contain token X?", returning structured
//! matches. Classifiers are stateless: the same input always produces the
//! same output, and no match state survives between calls. "No match" is a
//! normal return (`None` or an empty `Vec`), never an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

/// `[text](url)` or `![text](url)` occurrence within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch {
    /// The full matched substring, e.g. `[here](doc.md)`.
    pub full: String,
    /// Link text (or image caption), possibly empty.
    pub text: String,
    /// The URL between the parentheses, possibly empty.
    pub url: String,
}

/// `<img ... src="..." ...>` occurrence within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlImageMatch {
    /// The full matched tag.
    pub full: String,
    /// Value of the `src` attribute, possibly empty.
    pub src: String,
}

/// Decomposition of a URL that carries no `scheme://` protocol marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeUrl {
    /// Portion before the first `#`, possibly empty.
    pub file: String,
    /// The `#...` suffix including the `#`, when present.
    pub section: Option<String>,
}

/// A whole-string http/https/ftp URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsoluteUrl {
    /// The URL, scheme included.
    pub url: String,
}

/// A code fence delimiter line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFence {
    /// Info string after the fence characters, trimmed. Empty for bare fences.
    pub arguments: String,
}

/// A MyST directive declaration, `{name} arguments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// The directive name between the braces.
    pub name: String,
    /// Everything after the closing brace, trimmed.
    pub arguments: String,
}

/// A pandoc-style attribute block `{...#id...}` occurrence within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    /// The full matched block including braces.
    pub full: String,
    /// The identifier following the first `#` inside the braces.
    pub id: String,
}

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?P<text>.*?)\]\((?P<url>.*?)\)").expect("valid regex"));

static IMAGE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(?P<text>.*?)\]\((?P<url>.*?)\)").expect("valid regex"));

static HTML_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img\s+[^>]*src="(?P<src>[^"]*)"[^>]*>"#).expect("valid regex"));

static ABSOLUTE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<url>(?:https?|ftp)://\S*)$").expect("valid regex"));

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:`{3,}|~{3,})\s*(?P<arguments>.*?)\s*$").expect("valid regex"));

static BACKTICK_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*`{3,}\s*(?P<arguments>.*?)\s*$").expect("valid regex"));

static YAML_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-{3}|\.{3})\s*$").expect("valid regex"));

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{(?P<name>\w+)\}\s*(?P<arguments>.*?)\s*$").expect("valid regex"));

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}#]*#(?P<id>[^\s}]+)[^}]*\}").expect("valid regex"));

/// Find every `[text](url)` hyperlink in a line, left to right.
///
/// Image syntax is excluded: a match directly preceded by `!` is skipped,
/// and scanning resumes one byte past the skipped match's start so that
/// bracketed text inside an image caption is still examined.
pub fn link_matches(line: &str) -> Vec<LinkMatch> {
    let mut matches = Vec::new();
    let mut at = 0;
    while let Some(caps) = LINK.captures_at(line, at) {
        let Some(m) = caps.get(0) else { break };
        let preceded_by_bang =
            m.start() > 0 && line.as_bytes().get(m.start() - 1) == Some(&b'!');
        if preceded_by_bang {
            at = m.start() + 1;
            continue;
        }
        matches.push(link_match_from_captures(&caps, m.as_str()));
        at = m.end();
    }
    matches
}

/// Find every `![caption](url)` image link in a line, left to right.
/// A trailing attribute block such as `{#fig:id}` is not part of the match.
pub fn image_link_matches(line: &str) -> Vec<LinkMatch> {
    IMAGE_LINK
        .captures_iter(line)
        .map(|caps| {
            let full = caps.get(0).map_or("", |m| m.as_str());
            link_match_from_captures(&caps, full)
        })
        .collect()
}

fn link_match_from_captures(caps: &regex::Captures<'_>, full: &str) -> LinkMatch {
    LinkMatch {
        full: full.to_string(),
        text: caps.name("text").map_or("", |m| m.as_str()).to_string(),
        url: caps.name("url").map_or("", |m| m.as_str()).to_string(),
    }
}

/// Find every `<img ...>` tag carrying a `src` attribute in a line.
/// Tags without `src` do not match.
pub fn html_image_matches(line: &str) -> Vec<HtmlImageMatch> {
    HTML_IMAGE
        .captures_iter(line)
        .map(|caps| HtmlImageMatch {
            full: caps.get(0).map_or("", |m| m.as_str()).to_string(),
            src: caps.name("src").map_or("", |m| m.as_str()).to_string(),
        })
        .collect()
}

/// Classify a whole string as an absolute URL: `http`, `https`, or `ftp`
/// scheme followed by `://` and no embedded whitespace. Substring matches
/// don't count; this runs against an already-extracted URL.
pub fn absolute_url(url: &str) -> Option<AbsoluteUrl> {
    ABSOLUTE_URL.captures(url).map(|caps| AbsoluteUrl {
        url: caps.name("url").map_or("", |m| m.as_str()).to_string(),
    })
}

/// Classify a whole string as a relative URL: anything not containing a
/// `://` protocol marker, split at the first `#` into file and section.
///
/// Deliberately permissive: bare host strings like `www.google.ca` have no
/// scheme and therefore classify as relative. Downstream link partitioning
/// depends on this no-scheme rule, so it must not be tightened.
pub fn relative_url(url: &str) -> Option<RelativeUrl> {
    if url.contains("://") {
        return None;
    }
    match url.split_once('#') {
        Some((file, section)) => Some(RelativeUrl {
            file: file.to_string(),
            section: Some(format!("#{section}")),
        }),
        None => Some(RelativeUrl { file: url.to_string(), section: None }),
    }
}

/// Classify a line as a code fence delimiter: optional indentation, then a
/// run of three or more backticks or tildes, then a trimmed info string.
pub fn code_fence(line: &str) -> Option<CodeFence> {
    fence_from(&CODE_FENCE, line)
}

/// Strict fence variant accepting only backticks. MyST directives require
/// backtick fences, so tilde fences never open a directive.
pub fn backtick_fence(line: &str) -> Option<CodeFence> {
    fence_from(&BACKTICK_FENCE, line)
}

fn fence_from(pattern: &Regex, line: &str) -> Option<CodeFence> {
    pattern.captures(line).map(|caps| CodeFence {
        arguments: caps.name("arguments").map_or("", |m| m.as_str()).to_string(),
    })
}

/// Classify a line as a YAML block delimiter: exactly `---` or `...` at
/// column zero, with nothing but trailing whitespace after it.
pub fn yaml_delimiter(line: &str) -> bool {
    YAML_DELIMITER.is_match(line)
}

/// Parse a fence's info string as a MyST directive declaration,
/// `{directivename} arguments`. The caller strips the fence characters
/// first; a raw fence line such as ```` ```{note} ```` does not match here.
pub fn directive_string(arguments: &str) -> Option<Directive> {
    DIRECTIVE.captures(arguments).map(|caps| Directive {
        name: caps.name("name").map_or("", |m| m.as_str()).to_string(),
        arguments: caps.name("arguments").map_or("", |m| m.as_str()).to_string(),
    })
}

/// Find every `{...#id...}` attribute block in a line.
pub fn attribute_matches(line: &str) -> Vec<AttributeMatch> {
    ATTRIBUTE
        .captures_iter(line)
        .map(|caps| AttributeMatch {
            full: caps.get(0).map_or("", |m| m.as_str()).to_string(),
            id: caps.name("id").map_or("", |m| m.as_str()).to_string(),
        })
        .collect()
}

/// ATX header classifier for one fixed level.
///
/// Matches `#` repeated exactly `level` times, at most three leading spaces,
/// mandatory whitespace between the hashes and the title. The whitespace
/// requirement means a longer hash run never matches a lower level.
pub struct AtxHeaderRule {
    level: u32,
    pattern: Regex,
}

impl AtxHeaderRule {
    /// Build a classifier for headers of the given level.
    ///
    /// # Errors
    ///
    /// Returns `Error::HeaderLevel` for levels outside 1–6, before any
    /// scanning can occur.
    ///
    /// # Panics
    ///
    /// Panics if the generated header regex is invalid (compile-time invariant).
    pub fn new(level: u32) -> Result<Self, Error> {
        if !(1..=6).contains(&level) {
            return Err(Error::HeaderLevel { level });
        }
        let pattern = Regex::new(&format!(r"^ {{0,3}}#{{{level}}}\s+(?P<title>.*?)\s*$"))
            .expect("valid regex");
        Ok(Self { level, pattern })
    }

    /// The level this classifier was built for.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Extract the trimmed title if the line is a header of this level.
    pub fn title(&self, line: &str) -> Option<String> {
        self.pattern
            .captures(line)
            .map(|caps| caps.name("title").map_or("", |m| m.as_str()).to_string())
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;

    #[test]
    fn hyperlinks_match_left_to_right() {
        let line = "See [one](a.md) and [two](b.md#sec) here.";
        let matches = link_matches(line);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].full, "[one](a.md)");
        assert_eq!(matches[0].text, "one");
        assert_eq!(matches[0].url, "a.md");
        assert_eq!(matches[1].url, "b.md#sec");
    }

    #[test]
    fn image_syntax_is_not_a_hyperlink() {
        assert!(link_matches("![cap](image.png)").is_empty());
        let mixed = "![cap](image.png) then [link](doc.md)";
        let matches = link_matches(mixed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].url, "doc.md");
    }

    #[test]
    fn bracketed_text_inside_image_caption_still_scans() {
        let matches = link_matches("![a [b](c)](d)");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].full, "[b](c)");
    }

    #[test]
    fn calling_a_classifier_twice_yields_identical_results() {
        let line = "pre [text](url) post";
        assert_eq!(link_matches(line), link_matches(line));
    }

    #[test]
    fn image_links_match_and_ignore_attribute_blocks() {
        let matches = image_link_matches("![Caption.](image.png){#fig:id}");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].full, "![Caption.](image.png)");
        assert_eq!(matches[0].text, "Caption.");
        assert_eq!(matches[0].url, "image.png");
    }

    #[test]
    fn image_links_allow_empty_captions_and_urls() {
        let matches = image_link_matches("![](image.png) and ![]()");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text, "");
        assert_eq!(matches[1].url, "");
    }

    #[test]
    fn html_images_require_src() {
        let line = r#"<img alt="x" src="a.png"> <img src="b.png" width="4">"#;
        let matches = html_image_matches(line);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].src, "a.png");
        assert_eq!(matches[1].src, "b.png");

        assert!(html_image_matches("<img/>").is_empty());
        assert!(html_image_matches(r#"<img alt="no source">"#).is_empty());
    }

    #[test]
    fn absolute_urls_cover_http_https_ftp_only() {
        for url in [
            "https://github.com/tomduck/pandoc-fignos",
            "http://github.com/tomduck/pandoc-fignos",
            "ftp://github.com/tomduck/pandoc-fignos",
        ] {
            assert!(absolute_url(url).is_some(), "{url}");
        }
        for url in [
            "ftps://github.com/tomduck/pandoc-fignos",
            "http://github.com/ tomduck/ pandoc-fignos",
            "www.google.ca",
            "google.com",
            "./relative.md",
        ] {
            assert!(absolute_url(url).is_none(), "{url}");
        }
    }

    #[test]
    fn relative_urls_are_anything_without_a_scheme() {
        for url in ["www.google.ca", "google.com", "./ch0_1_images.md", ""] {
            assert!(relative_url(url).is_some(), "{url}");
        }
        for url in ["https://www.google.ca", "ftp://x", "a://b"] {
            assert!(relative_url(url).is_none(), "{url}");
        }
    }

    #[test]
    fn relative_urls_split_at_the_first_hash() {
        let r = relative_url("./ch0_1_images.md#sec:ch0_1_images-1").unwrap();
        assert_eq!(r.file, "./ch0_1_images.md");
        assert_eq!(r.section.as_deref(), Some("#sec:ch0_1_images-1"));

        let bare = relative_url("./ch0_1_images.md").unwrap();
        assert_eq!(bare.file, "./ch0_1_images.md");
        assert_eq!(bare.section, None);

        let anchor_only = relative_url("#eq:maxwell").unwrap();
        assert_eq!(anchor_only.file, "");
        assert_eq!(anchor_only.section.as_deref(), Some("#eq:maxwell"));
    }

    #[test]
    fn code_fences_accept_backticks_and_tildes() {
        assert_eq!(code_fence("```").unwrap().arguments, "");
        assert_eq!(code_fence("````").unwrap().arguments, "");
        assert_eq!(code_fence("~~~").unwrap().arguments, "");
        assert_eq!(code_fence("   ``` python  ").unwrap().arguments, "python");
        assert_eq!(code_fence("```{admonition} A title").unwrap().arguments, "{admonition} A title");
        assert!(code_fence("``").is_none());
        assert!(code_fence("text ```").is_none());
    }

    #[test]
    fn backtick_fences_reject_tildes() {
        assert!(backtick_fence("```{toctree}").is_some());
        assert!(backtick_fence("~~~{toctree}").is_none());
        assert!(backtick_fence("~~~").is_none());
    }

    #[test]
    fn yaml_delimiters_require_column_zero() {
        assert!(yaml_delimiter("---"));
        assert!(yaml_delimiter("--- "));
        assert!(yaml_delimiter("..."));
        assert!(!yaml_delimiter("  --- "));
        assert!(!yaml_delimiter("----"));
        assert!(!yaml_delimiter("- - -"));
    }

    #[test]
    fn directive_strings_parse_name_and_arguments() {
        let d = directive_string("{admonition} This is a title").unwrap();
        assert_eq!(d.name, "admonition");
        assert_eq!(d.arguments, "This is a title");

        let bare = directive_string("  {toctree}  ").unwrap();
        assert_eq!(bare.name, "toctree");
        assert_eq!(bare.arguments, "");

        assert!(directive_string("```{admonition}").is_none());
        assert!(directive_string("plain text").is_none());
    }

    #[test]
    fn attribute_blocks_extract_ids() {
        let matches = attribute_matches("## Header {#sec:one}");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "sec:one");

        let classy = attribute_matches("![x](y.png){.wide #fig:two width=50%}");
        assert_eq!(classy[0].id, "fig:two");

        assert!(attribute_matches("no attributes here").is_empty());
        assert!(attribute_matches("{.class-only}").is_empty());
    }

    #[test]
    fn atx_headers_match_their_level_only() {
        let h2 = AtxHeaderRule::new(2).unwrap();
        assert_eq!(h2.title("## Title text  ").as_deref(), Some("Title text"));
        assert_eq!(h2.title("   ## Indented").as_deref(), Some("Indented"));
        assert!(h2.title("# Too few").is_none());
        assert!(h2.title("### Too many").is_none());
        assert!(h2.title("    ## Four spaces").is_none());
        assert!(h2.title("##NoSpace").is_none());
    }

    #[test]
    fn atx_header_levels_outside_range_fail_fast() {
        assert!(AtxHeaderRule::new(0).is_err());
        assert!(AtxHeaderRule::new(7).is_err());
        for level in 1..=6 {
            assert!(AtxHeaderRule::new(level).is_ok());
        }
    }
}
