use askama::Template;
use tracing::error;

/// Compiled-in page served when the `404` template itself cannot render.
#[derive(Template)]
#[template(path = "fallback.html")]
pub struct FallbackTemplate<'a> {
    pub page_trace: &'a str,
    pub fallback_trace: &'a str,
}

/// Render the last-resort page. Both traces must already be comment-safe.
pub fn render_fallback_page(page_trace: &str, fallback_trace: &str) -> String {
    let template = FallbackTemplate {
        page_trace,
        fallback_trace,
    };
    template.render().unwrap_or_else(|err| {
        error!(error = %err, "fallback template failed to render");
        format!(
            "<!DOCTYPE html><title>Page Not Found</title><h1>Page Not Found</h1>\n<!-- error: {page_trace} -->\n<!-- error: {fallback_trace} -->"
        )
    })
}
