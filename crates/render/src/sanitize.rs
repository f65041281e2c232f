//! Allow-list HTML sanitizer.
//!
//! Attribute, style and URL filtering is delegated to `ammonia`. A policy
//! either strips disallowed tags, keeping their text content (`script` and
//! `style` bodies included, as inert escaped text), or escapes them so they
//! show up as literal text.

use std::collections::{HashMap, HashSet};

use ammonia::Builder;

/// Tags allowed by [`SanitizePolicy::safe`].
pub const SAFE_TAGS: &[&str] = &[
    "p", "b", "br", "em", "blockquote", "strong", "i", "u", "a", "ul", "li", "ol", "img", "span",
    "h1", "h2", "h3", "h4", "h5", "h6", "h7", "table", "td", "thead", "tbody", "tr", "div", "sub",
    "sup", "small",
];

/// Inline style properties allowed by [`SanitizePolicy::safe`].
pub const SAFE_STYLES: &[&str] = &[
    "color",
    "font-weight",
    "font-size",
    "font-family",
    "text-decoration",
    "font-variant",
];

/// Attributes allowed on every tag, whatever the tag set.
pub const GENERIC_ATTRIBUTES: &[&str] = &[
    "style",
    "href",
    "alt",
    "title",
    "class",
    "border",
    "padding",
    "margin",
    "line-height",
];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Allowed tags, attributes and styles plus the strip-vs-escape mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizePolicy {
    tags: HashSet<&'static str>,
    generic_attributes: HashSet<&'static str>,
    tag_attributes: HashMap<&'static str, HashSet<&'static str>>,
    styles: HashSet<&'static str>,
    strip: bool,
}

impl SanitizePolicy {
    /// Policy with the given tags and styles and the standard attribute list.
    pub fn new(
        tags: impl IntoIterator<Item = &'static str>,
        styles: impl IntoIterator<Item = &'static str>,
        strip: bool,
    ) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            generic_attributes: GENERIC_ATTRIBUTES.iter().copied().collect(),
            tag_attributes: HashMap::from([("img", HashSet::from(["src"]))]),
            styles: styles.into_iter().collect(),
            strip,
        }
    }

    /// Safe formatting subset (`<b>`, `<i>`, `<img>`, tables...).
    pub fn safe(strip: bool) -> Self {
        Self::new(SAFE_TAGS.iter().copied(), SAFE_STYLES.iter().copied(), strip)
    }

    /// No tags and no styles at all.
    pub fn escape_all(strip: bool) -> Self {
        Self::new([], [], strip)
    }

    pub fn from_flags(strip: bool, allow_safe: bool) -> Self {
        if allow_safe {
            Self::safe(strip)
        } else {
            Self::escape_all(strip)
        }
    }

    pub fn strips(&self) -> bool {
        self.strip
    }

    pub fn allows_tag(&self, name: &str) -> bool {
        self.tags.contains(name)
    }

    pub fn allows_style(&self, property: &str) -> bool {
        self.styles.contains(property)
    }

    fn builder(&self) -> Builder<'static> {
        let mut builder = Builder::empty();
        builder
            .tags(self.tags.clone())
            .generic_attributes(self.generic_attributes.clone())
            .tag_attributes(self.tag_attributes.clone())
            .filter_style_properties(self.styles.clone())
            .url_schemes(URL_SCHEMES.iter().copied().collect())
            .link_rel(None)
            .strip_comments(true);
        builder
    }

    /// Clean `text` under this policy.
    pub fn clean(&self, text: &str) -> String {
        let builder = self.builder();
        if self.strip {
            builder.clean(text).to_string()
        } else {
            let escaped = escape_disallowed_tags(text, |name| self.allows_tag(name));
            builder.clean(&escaped).to_string()
        }
    }
}

/// Strip or escape HTML tags, attributes and styles using an allow-list.
///
/// With `allow_safe == false` every tag is stripped or escaped; otherwise a
/// small set of formatting tags survives.
pub fn sanitize_html(text: &str, strip: bool, allow_safe: bool) -> String {
    SanitizePolicy::from_flags(strip, allow_safe).clean(text)
}

/// Replace every tag whose name is not allowed with its escaped source text.
fn escape_disallowed_tags(text: &str, allowed: impl Fn(&str) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        if candidate.starts_with("<!--") {
            // Comments are removed by ammonia.
            out.push_str("<!--");
            rest = &candidate[4..];
            continue;
        }

        match scan_tag(candidate) {
            Some((name, len)) => {
                let source = &candidate[..len];
                if allowed(&name) {
                    out.push_str(source);
                } else {
                    escape_into(&mut out, source);
                }
                rest = &candidate[len..];
            }
            None => {
                out.push_str("&lt;");
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Position inside a start or end tag, after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrState {
    BeforeName,
    Name,
    AfterName,
    BeforeValue,
    Quoted(u8),
    Unquoted,
}

/// Lower-cased name and byte length of the tag at the start of `s`.
///
/// Tag and attribute boundaries are found the way an HTML tokenizer finds
/// them: a quote only opens a value right after `=`, so `a"b` is an
/// unquoted value and `>` inside it still closes the tag.
fn scan_tag(s: &str) -> Option<(String, usize)> {
    let bytes = s.as_bytes();
    let mut i = 1;
    if bytes.get(i) == Some(&b'/') {
        i += 1;
    }

    let name_start = i;
    if !bytes.get(i).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    while bytes
        .get(i)
        .is_some_and(|b| !b.is_ascii_whitespace() && *b != b'/' && *b != b'>')
    {
        i += 1;
    }
    let name = s[name_start..i].to_ascii_lowercase();

    let mut state = AttrState::BeforeName;
    while let Some(&b) = bytes.get(i) {
        state = match (state, b) {
            (AttrState::Quoted(q), _) if b == q => AttrState::BeforeName,
            (AttrState::Quoted(q), _) => AttrState::Quoted(q),
            (_, b'>') => return Some((name, i + 1)),
            (AttrState::BeforeValue, b'"' | b'\'') => AttrState::Quoted(b),
            (AttrState::BeforeValue, b) if b.is_ascii_whitespace() => AttrState::BeforeValue,
            (AttrState::BeforeValue, _) => AttrState::Unquoted,
            (AttrState::Unquoted, b) if b.is_ascii_whitespace() => AttrState::BeforeName,
            (AttrState::Unquoted, _) => AttrState::Unquoted,
            (AttrState::Name | AttrState::AfterName, b'=') => AttrState::BeforeValue,
            (_, b'/') => AttrState::BeforeName,
            (AttrState::Name, b) if b.is_ascii_whitespace() => AttrState::AfterName,
            (AttrState::BeforeName | AttrState::AfterName, b) if b.is_ascii_whitespace() => state,
            _ => AttrState::Name,
        };
        i += 1;
    }
    None
}

fn escape_into(out: &mut String, source: &str) {
    for c in source.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn script_text_is_kept_when_stripping() {
        assert_eq!(sanitize_html("<script>alert(1)</script>", true, true), "alert(1)");
        assert_eq!(sanitize_html("<style>b{}</style>x", true, false), "b{}x");
    }

    #[test]
    fn script_is_escaped_when_not_stripping() {
        let out = sanitize_html("<script>alert(1)</script>", false, true);
        assert_eq!(out, "&lt;script&gt;alert(1)&lt;/script&gt;");
    }

    #[test]
    fn safe_tags_survive() {
        assert_eq!(sanitize_html("<b>bold</b> text", true, true), "<b>bold</b> text");
        assert_eq!(sanitize_html("<p>para</p>", false, true), "<p>para</p>");
    }

    #[test]
    fn all_tags_go_when_safe_subset_is_off() {
        assert_eq!(sanitize_html("<p>Hello <b>World</b></p>", true, false), "Hello World");
        assert_eq!(
            sanitize_html("<b>hi</b>", false, false),
            "&lt;b&gt;hi&lt;/b&gt;"
        );
    }

    #[test]
    fn event_handlers_are_dropped() {
        assert_eq!(
            sanitize_html(r#"<p onclick="steal()">hi</p>"#, true, true),
            "<p>hi</p>"
        );
    }

    #[test]
    fn javascript_urls_are_dropped() {
        let out = sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#, true, true);
        assert_eq!(out, "<a>x</a>");
    }

    #[test]
    fn src_is_only_allowed_on_images() {
        let img = sanitize_html(r#"<img src="https://example.com/a.png" alt="a">"#, true, true);
        assert!(img.contains(r#"src="https://example.com/a.png""#));
        assert!(img.contains(r#"alt="a""#));

        let span = sanitize_html(r#"<span src="https://example.com/a.png">x</span>"#, true, true);
        assert_eq!(span, "<span>x</span>");
    }

    #[test]
    fn disallowed_style_properties_are_removed() {
        let out = sanitize_html(
            r#"<span style="color: red; position: fixed">x</span>"#,
            true,
            true,
        );
        assert!(out.contains("color"));
        assert!(!out.contains("position"));
    }

    #[test]
    fn stray_angle_brackets_stay_text() {
        assert_eq!(sanitize_html("1 < 2 > 0", false, true), "1 &lt; 2 &gt; 0");
    }

    #[test]
    fn unterminated_tag_is_escaped() {
        let out = sanitize_html("<script src=x", false, true);
        assert!(!out.contains('<'));
    }

    #[test]
    fn quotes_outside_attribute_values_do_not_hide_tags() {
        let out = sanitize_html(
            r#"<b title=a"b><script>alert(1)</script><i title=">">x</i></b>"#,
            false,
            true,
        );
        assert!(out.contains("&lt;script&gt;alert(1)&lt;/script&gt;"), "{out}");
        assert!(!out.contains("<script"));
    }

    #[test]
    fn quoted_values_may_contain_angle_brackets() {
        let out = sanitize_html(r#"<span title="a>b">x</span><em>y</em>"#, false, true);
        assert!(out.contains("<em>y</em>"), "{out}");
        assert!(out.contains("x</span>"), "{out}");
    }

    #[test]
    fn odd_tag_names_are_not_mistaken_for_allowed_ones() {
        let out = sanitize_html(r#"<b"x>hi"#, false, true);
        assert!(out.starts_with("&lt;b"), "{out}");
    }

    #[test]
    fn policy_flags() {
        let policy = SanitizePolicy::from_flags(false, true);
        assert!(!policy.strips());
        assert!(policy.allows_tag("h7"));
        assert!(policy.allows_style("font-variant"));
        assert!(!SanitizePolicy::escape_all(true).allows_tag("p"));
    }

    fn arb_safe_markup() -> impl Strategy<Value = String> {
        let text = "[a-zA-Z0-9 ]{0,12}";
        text.prop_recursive(3, 16, 4, |inner| {
            let tag = prop::sample::select(vec![
                "b", "em", "strong", "i", "u", "span", "small", "sub", "sup",
            ]);
            (tag, prop::collection::vec(inner, 1..4), any::<bool>()).prop_map(
                |(tag, children, with_class)| {
                    let attrs = if with_class { r#" class="x""# } else { "" };
                    format!("<{tag}{attrs}>{}</{tag}>", children.concat())
                },
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: stripping with no allowed tags leaves no tag markers.
        #[test]
        fn strip_everything_leaves_no_markers(text in "\\PC{0,64}") {
            let out = sanitize_html(&text, true, false);
            prop_assert!(!out.contains('<'));
            prop_assert!(!out.contains('>'));
        }

        /// Property: safe markup is a fixed point of escape-mode sanitizing.
        #[test]
        fn safe_markup_is_idempotent(markup in arb_safe_markup()) {
            let once = sanitize_html(&markup, false, true);
            let twice = sanitize_html(&once, false, true);
            prop_assert_eq!(once, twice);
        }

        /// Property: whatever sits inside an allowed tag, a following
        /// disallowed tag is never passed through as markup in escape mode.
        #[test]
        fn attribute_junk_never_unescapes_script(junk in "[a-z=\"' /]{0,12}") {
            let markup = format!("<b {junk}><script>alert(1)</script></b>");
            let out = sanitize_html(&markup, false, true);
            prop_assert!(!out.contains("<script"), "{}", out);
        }
    }
}
