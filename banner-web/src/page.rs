use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::Routes;

/// What the form shows besides the banner list
#[derive(Debug, Default)]
pub(crate) struct FormValues<'a> {
    pub text: &'a str,
    pub banner: Option<&'a str>,
}

pub(crate) fn index(
    routes: &Routes,
    banners: &[String],
    values: &FormValues<'_>,
    art: Option<&str>,
) -> Markup {
    let static_prefix = routes.static_prefix.trim_end_matches('/');
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "ASCII Art" }
                link rel="stylesheet" href={ (static_prefix) "/style.css" };
            }
            body {
                main {
                    h1 { "ASCII Art" }
                    form method="post" action=(routes.render) {
                        // the parser drops a newline directly after <pre> and <textarea>
                        textarea name="text" rows="4" cols="60" required { "\n" (values.text) }
                        select name="banner" {
                            @for name in banners {
                                option value=(name) selected[values.banner == Some(name.as_str())] {
                                    (name)
                                }
                            }
                        }
                        button type="submit" { "Render" }
                    }
                    @if let Some(art) = art {
                        pre class="art" { "\n" (art) }
                    }
                }
            }
        }
    }
}

pub(crate) fn error(status: StatusCode, detail: Option<&str>) -> Markup {
    let title = match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                main {
                    h1 { (title) }
                    @if let Some(detail) = detail {
                        p class="error" { (detail) }
                    }
                }
            }
        }
    }
}
