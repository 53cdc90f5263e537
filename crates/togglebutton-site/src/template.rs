//! HTML page template for static site generation.

use std::fmt::Write;

use togglebutton_renderer::escape_html;

use crate::app::Script;

/// All data needed to render a page.
pub struct PageData<'a> {
    /// Page title, from the first heading.
    pub title: Option<&'a str>,
    /// Site name shown in the window title.
    pub site_name: &'a str,
    /// Rendered page body.
    pub html_content: &'a str,
    /// Relative URL prefix of the static directory (e.g. `../_static/`).
    pub static_prefix: &'a str,
    /// Stylesheets in the static directory.
    pub stylesheets: &'a [String],
    /// Scripts, in inclusion order.
    pub scripts: &'a [Script],
}

/// Render a complete HTML page.
pub fn render_page(page: &PageData<'_>) -> String {
    let mut html = String::with_capacity(page.html_content.len() + 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let title = match page.title {
        Some(title) if !title.is_empty() => format!("{title} - {}", page.site_name),
        _ => page.site_name.to_owned(),
    };
    let _ = writeln!(html, "<title>{}</title>", escape_html(&title));

    for stylesheet in page.stylesheets {
        let _ = writeln!(
            html,
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape_html(&format!("{}{stylesheet}", page.static_prefix))
        );
    }
    for script in page.scripts {
        match script {
            Script::File(name) => {
                let _ = writeln!(
                    html,
                    "<script src=\"{}\"></script>",
                    escape_html(&format!("{}{name}", page.static_prefix))
                );
            }
            Script::Inline(body) => {
                let _ = writeln!(html, "<script>{}</script>", escape_script(body));
            }
        }
    }

    html.push_str("</head>\n<body>\n<main>\n<article>\n");
    html.push_str(page.html_content);
    html.push_str("\n</article>\n</main>\n</body>\n</html>\n");
    html
}

/// Keep an inline script body from closing its `<script>` element.
fn escape_script(body: &str) -> String {
    body.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page<'a>(scripts: &'a [Script], stylesheets: &'a [String]) -> PageData<'a> {
        PageData {
            title: Some("Setup"),
            site_name: "Docs",
            html_content: "<p>Body</p>",
            static_prefix: "../_static/",
            stylesheets,
            scripts,
        }
    }

    #[test]
    fn test_render_page_assets_in_order() {
        let scripts = [
            Script::Inline(r#"let toggleHintShow = "Show";"#.to_owned()),
            Script::File("togglebutton.js".to_owned()),
        ];
        let stylesheets = ["togglebutton.css".to_owned()];
        let html = render_page(&page(&scripts, &stylesheets));

        assert!(html.contains("<title>Setup - Docs</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="../_static/togglebutton.css">"#));
        let inline = html
            .find(r#"<script>let toggleHintShow = "Show";</script>"#)
            .unwrap();
        let file = html
            .find(r#"<script src="../_static/togglebutton.js"></script>"#)
            .unwrap();
        assert!(inline < file);
        assert!(html.contains("<article>\n<p>Body</p>\n</article>"));
    }

    #[test]
    fn test_title_falls_back_to_site_name() {
        let mut data = page(&[], &[]);
        data.title = None;
        assert!(render_page(&data).contains("<title>Docs</title>"));
    }

    #[test]
    fn test_inline_script_cannot_close_element() {
        let scripts = [Script::Inline(r#"var s = "</script><b>";"#.to_owned())];
        let html = render_page(&page(&scripts, &[]));
        assert!(html.contains(r#"<script>var s = "<\/script><b>";</script>"#));
    }

    #[test]
    fn test_title_is_escaped() {
        let mut data = page(&[], &[]);
        data.title = Some("A & B");
        assert!(render_page(&data).contains("<title>A &amp; B - Docs</title>"));
    }
}
