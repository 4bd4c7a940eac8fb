//! HTML rendering with tera
//!
//! Templates are compiled into the binary so the server has no runtime
//! file dependency.

use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use tera::{Context, Tera};

use crate::core::error::Result;
use crate::core::flash::{FlashCookie, Notice};
use crate::core::i18n::Translator;

pub const LIST_TEMPLATE: &str = "list_wrapper.html";
pub const PROPOSAL_FORM_TEMPLATE: &str = "proposals/edit.html";

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../templates/layout.html")),
    (LIST_TEMPLATE, include_str!("../../templates/list_wrapper.html")),
    (
        PROPOSAL_FORM_TEMPLATE,
        include_str!("../../templates/proposals/edit.html"),
    ),
];

/// Compiled page templates
#[derive(Debug, Clone)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    /// Render `template` with `model` flattened into the context
    ///
    /// `model` must serialize to a map. `locale` and `flash` are added on
    /// top of it.
    pub fn render<T: Serialize>(
        &self,
        template: &str,
        model: &T,
        translator: &Translator,
        flash: Option<&Notice>,
    ) -> Result<String> {
        let mut context = Context::from_serialize(model)?;
        context.insert("locale", translator.locale());
        context.insert("flash", &flash.map(|n| n.translate(translator)));
        Ok(self.tera.render(template, &context)?)
    }
}

/// A rendered page; consumes any pending flash notice
pub struct Page {
    pub body: String,
    pub clear_flash: Option<FlashCookie>,
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        if let Some(value) = self.clear_flash.as_ref().and_then(FlashCookie::clear) {
            headers.insert(SET_COOKIE, value);
        }
        (headers, Html(self.body)).into_response()
    }
}
