//! Assembly of the complete preview document.
//!
//! [`assemble`] is a pure function of the cached assets, the extension list,
//! the appearance and the render request. It cannot fail: missing assets only
//! make the document plainer, the skeleton is always the same.

use crate::cache::AssetCache;
use crate::extensions::ExtensionScripts;
use crate::theme::{Appearance, TextDirection};

/// KaTeX release used for math rendering.
pub const KATEX_VERSION: &str = "0.10.0-rc";

/// Mermaid release used for diagram rendering.
pub const MERMAID_VERSION: &str = "9.0.0";

const CDNJS_BASE: &str = "https://cdnjs.cloudflare.com/ajax/libs";

/// Returns the CDN URL of a KaTeX file, e.g. `katex.min.js`.
pub fn katex_url(file: &str) -> String {
    format!("{CDNJS_BASE}/KaTeX/{KATEX_VERSION}/{file}")
}

pub fn mermaid_url() -> String {
    format!("{CDNJS_BASE}/mermaid/{MERMAID_VERSION}/mermaid.min.js")
}

/// Renders math in the whole body, `$$...$$` in display mode and `$...$` inline.
const MATH_RENDER_SCRIPT: &str = r#"<script>
      renderMathInElement(document.body, {delimiters: [
        {left: "$$", right: "$$", display: true},
        {left: "$", right: "$", display: false},
      ]});
    </script>"#;

/// Turns `<pre class="mermaid">` and `<pre><code class="language-mermaid">` into
/// the `<div class="mermaid">` expected by Mermaid, keeping the diagram source.
const MERMAID_BOOTSTRAP: &str = r#"<script>
      var config = {
        startOnLoad: true,
        theme: (window.matchMedia && window.matchMedia("(prefers-color-scheme: dark)").matches) ? "dark" : "default",
        flowchart: {
          useMaxWidth: false,
          htmlLabels: true
        }
      };
      mermaid.initialize(config);
      document.querySelectorAll("pre.mermaid, pre>code.language-mermaid").forEach($el => {
        if ($el.tagName === "CODE")
          $el = $el.parentElement
        var $div = document.createElement("div");
        $div.className = "mermaid";
        $div.textContent = $el.textContent;
        $el.replaceWith($div);
      })
    </script>"#;

const HIGHLIGHT_INIT_SCRIPT: &str =
    "<script>if (window.hljs) { hljs.initHighlightingOnLoad(); }</script>";

/// Parameters of a single render, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    /// HTML fragment from the converter, embedded verbatim.
    pub content: String,
    pub direction: TextDirection,
    /// Vertical scroll position in pixels.
    pub scroll_offset: i64,
}

impl RenderRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn scroll_offset(mut self, scroll_offset: i64) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }
}

/// Theme rules appended after the cached stylesheets so that they win the cascade.
pub fn theme_overrides(appearance: &Appearance) -> String {
    let palette = &appearance.palette;
    let background = palette.background.as_str();
    let text = palette.text.as_str();
    let code = palette.code.as_str();
    let darker = palette.darker_background();

    format!(
        "html, body {{ background: {body}; }}
      code {{ background: {code} !important }}
      p, h1, h2, h3, h4, h5, h6, ul, ol, dl, li, table, tr {{ color: {text}; }}
      table tr {{ background: {background}; }}
      table tr:nth-child(2n) {{ background: {darker}; }}
      table tr th, table tr td {{ border-color: {code} }}",
        body = appearance.body_background(),
    )
}

/// Builds the complete HTML document for one render.
///
/// # Example
///
/// ```
/// use quill_core::{assemble, AssetCache, Appearance, ExtensionScripts, RenderRequest};
///
/// let html = assemble(
///     &AssetCache::default(),
///     &ExtensionScripts::default(),
///     &Appearance::default(),
///     &RenderRequest::new("<p>hi</p>").scroll_offset(42),
/// );
/// assert!(html.starts_with("<!DOCTYPE html>"));
/// assert!(html.contains("<p>hi</p>"));
/// assert!(html.contains("window.scrollTo(0, 42);"));
/// ```
pub fn assemble(
    assets: &AssetCache,
    extensions: &ExtensionScripts,
    appearance: &Appearance,
    request: &RenderRequest,
) -> String {
    let AssetCache {
        base_stylesheet,
        syntax_theme_stylesheet,
        engine_script,
    } = assets;
    let RenderRequest {
        content,
        direction,
        scroll_offset,
    } = request;

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>
    {syntax_theme_stylesheet}
    {base_stylesheet}
    {overrides}
  </style>
  <script>{engine_script}</script>
  {HIGHLIGHT_INIT_SCRIPT}

  <link rel="stylesheet" href="{katex_css}">
  <script src="{katex_js}"></script>
  <script src="{katex_auto_render}"></script>
  <script src="{mermaid_js}"></script>
</head>
<body dir="{dir}">
  {content}

  <div>
    <script>
      window.scrollTo(0, {scroll_offset});
    </script>
    {MATH_RENDER_SCRIPT}
    {MERMAID_BOOTSTRAP}
    {extension_scripts}
  </div>
</body>
</html>
"#,
        overrides = theme_overrides(appearance),
        katex_css = katex_url("katex.min.css"),
        katex_js = katex_url("katex.min.js"),
        katex_auto_render = katex_url("contrib/auto-render.min.js"),
        mermaid_js = mermaid_url(),
        dir = direction.html_dir(),
        extension_scripts = extensions.script_tags(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{HexColor, ThemePalette};

    fn assets() -> AssetCache {
        AssetCache {
            base_stylesheet: "/* base */".into(),
            syntax_theme_stylesheet: "/* syntax */".into(),
            engine_script: "var hljs = {};".into(),
        }
    }

    fn palette() -> ThemePalette {
        ThemePalette {
            background: HexColor::parse("#1E1E1E").unwrap(),
            text: HexColor::parse("#D4D4D4").unwrap(),
            code: HexColor::parse("#2D2D2D").unwrap(),
        }
    }

    fn render(request: &RenderRequest) -> String {
        assemble(
            &assets(),
            &ExtensionScripts::default(),
            &Appearance::default(),
            request,
        )
    }

    #[test]
    fn test_direction_attribute() {
        let rtl = render(&RenderRequest::new("").direction(TextDirection::RightToLeft));
        assert!(rtl.contains(r#"<body dir="rtl">"#));

        let natural = render(&RenderRequest::new("").direction(TextDirection::Natural));
        assert!(natural.contains(r#"<body dir="auto">"#));

        let unset = render(&RenderRequest::new(""));
        assert!(unset.contains(r#"<body dir="auto">"#));
    }

    #[test]
    fn test_content_and_scroll_pass_through() {
        let html = render(&RenderRequest::new("<p>hi</p>").scroll_offset(42));
        let body = &html[html.find("<body").unwrap()..];
        assert!(body.contains("<p>hi</p>"));
        assert!(body.contains("window.scrollTo(0, 42);"));
    }

    #[test]
    fn test_theme_overrides_contain_palette() {
        let appearance = Appearance {
            palette: palette(),
            use_system_appearance: false,
        };
        let css = theme_overrides(&appearance);

        assert!(css.contains("html, body { background: #1E1E1E; }"));
        assert!(css.contains("code { background: #2D2D2D !important }"));
        assert!(css.contains("color: #D4D4D4;"));
        assert!(css.contains(&format!(
            "table tr:nth-child(2n) {{ background: {}; }}",
            palette().background.darker()
        )));
        assert_eq!(css, theme_overrides(&appearance));
    }

    #[test]
    fn test_system_appearance_is_transparent() {
        let appearance = Appearance {
            palette: palette(),
            use_system_appearance: true,
        };
        let css = theme_overrides(&appearance);
        assert!(css.contains("html, body { background: transparent; }"));
        // Table rows keep the palette colors.
        assert!(css.contains("table tr { background: #1E1E1E; }"));
    }

    #[test]
    fn test_stylesheet_order() {
        let html = render(&RenderRequest::default());
        let syntax = html.find("/* syntax */").unwrap();
        let base = html.find("/* base */").unwrap();
        let overrides = html.find("html, body { background").unwrap();
        assert!(syntax < base && base < overrides);
    }

    #[test]
    fn test_idempotent() {
        let request = RenderRequest::new("<h1>Title</h1>").scroll_offset(7);
        assert_eq!(render(&request), render(&request));
    }

    #[test]
    fn test_empty_assets_still_well_formed() {
        let html = assemble(
            &AssetCache::default(),
            &ExtensionScripts::default(),
            &Appearance::default(),
            &RenderRequest::new("<p>hi</p>"),
        );
        assert!(html.starts_with("<!DOCTYPE html>\n<html>\n<head>"));
        assert!(html.contains("<script></script>"));
        assert!(html.trim_end().ends_with("</body>\n</html>"));
        assert_eq!(html.matches("<body").count(), 1);
    }

    #[test]
    fn test_third_party_libraries() {
        let html = render(&RenderRequest::default());
        assert!(html.contains(&format!(
            r#"<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/KaTeX/{KATEX_VERSION}/katex.min.css">"#
        )));
        assert!(html.contains("contrib/auto-render.min.js"));
        assert!(html.contains(&format!(
            r#"<script src="https://cdnjs.cloudflare.com/ajax/libs/mermaid/{MERMAID_VERSION}/mermaid.min.js"></script>"#
        )));
        assert!(html.contains(r#"{left: "$$", right: "$$", display: true}"#));
        assert!(html.contains(r#"{left: "$", right: "$", display: false}"#));
        assert!(html.contains("pre.mermaid, pre>code.language-mermaid"));
    }

    #[test]
    fn test_extension_scripts_after_bootstrap() {
        let extensions = ExtensionScripts::new(vec![
            "file:///plugins/a.js".into(),
            "file:///plugins/b.js".into(),
        ]);
        let html = assemble(
            &assets(),
            &extensions,
            &Appearance::default(),
            &RenderRequest::default(),
        );

        assert_eq!(html.matches(r#"<script src="file://"#).count(), 2);
        let a = html.find(r#"<script src="file:///plugins/a.js"></script>"#).unwrap();
        let b = html.find(r#"<script src="file:///plugins/b.js"></script>"#).unwrap();
        let mermaid = html.find("mermaid.initialize").unwrap();
        assert!(mermaid < a && a < b);
    }
}
