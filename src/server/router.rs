//! Request routing and the five endpoint behaviors.

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, error, warn};

use crate::parser::{self, HttpRequest, Method};
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::static_files::StaticFileServer;
use crate::store::{Error as StoreError, Filter, Record, RecordStore};

/// Confirmation page served after a successful record creation.
const ADD_PAGE: &str = "app_add.html";
/// Listing page template, contains the row substitution placeholder.
const LIST_PAGE: &str = "app_list.html";
/// The literal token in the listing template that the rendered rows replace.
const ROWS_PLACEHOLDER: &str = "{{students}}";

/// One listing table row. The surrounding newlines are part of the page
/// contract.
fn render_row(record: &Record) -> String {
    format!(
        "\n<tr>\n    <td>{}</td>\n    <td>{}</td>\n    <td>{}</td>\n</tr>\n",
        record.id, record.first, record.last
    )
}

/// Maps requests to endpoint behaviors.
///
/// Dispatch is keyed on the first path segment of the raw target, query
/// string still embedded, so `app-index?first=a` is one segment. The
/// router is infallible at its boundary: [`Router::dispatch`] always
/// returns a response, failures included.
pub struct Router {
    store: Arc<RecordStore>,
    files: StaticFileServer,
    www_root: PathBuf,
}

impl Router {
    pub fn new(
        store: Arc<RecordStore>,
        files: StaticFileServer,
        www_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            files,
            www_root: www_root.into(),
        }
    }

    /// Route a parsed request to its handler and produce the response.
    pub async fn dispatch(&self, req: &HttpRequest) -> HttpResponse {
        let segment = req.first_segment();
        debug!("dispatching {} {}", req.method, req.target);

        if segment == "app-add" {
            return match req.method {
                Method::POST => self.handle_add(req).await,
                _ => HttpResponse::method_not_allowed(),
            };
        }

        if segment == "app-json" {
            return match req.method {
                Method::GET => self.handle_json().await,
                _ => HttpResponse::method_not_allowed(),
            };
        }

        if segment.starts_with("app-index") {
            return match req.method {
                Method::GET => self.handle_index(segment).await,
                _ => HttpResponse::method_not_allowed(),
            };
        }

        match req.method {
            Method::GET => {
                let host = req.get_header("Host").map(String::as_str).unwrap_or("");
                self.files.serve(&req.target, host).await
            }
            _ => HttpResponse::method_not_allowed(),
        }
    }

    /// POST /app-add: create one record from a two-field urlencoded form,
    /// then serve the fixed confirmation page.
    async fn handle_add(&self, req: &HttpRequest) -> HttpResponse {
        let form = match parser::parse_form(&req.body) {
            Ok(form) => form,
            Err(e) => {
                warn!("rejected app-add form: {e}");
                return HttpResponse::bad_request();
            }
        };

        match self.store.append(&form.first, &form.last).await {
            Ok(record) => debug!("created record {}", record.id),
            Err(e @ StoreError::Write(_)) => {
                warn!("app-add persist failed: {e}");
                return HttpResponse::bad_request();
            }
            Err(e) => {
                error!("app-add store read failed: {e}");
                return HttpResponse::internal_error();
            }
        }

        self.serve_page(ADD_PAGE).await
    }

    /// GET /app-json: the full collection as a JSON array, `number`/`first`/
    /// `last` keys per record.
    async fn handle_json(&self) -> HttpResponse {
        let records = match self.store.query(&Filter::default()).await {
            Ok(records) => records,
            Err(e) => {
                error!("app-json store read failed: {e}");
                return HttpResponse::internal_error();
            }
        };

        match HttpResponse::new(StatusCode::Ok).with_json(&records) {
            Ok(response) => response,
            Err(e) => {
                error!("app-json serialization failed: {e}");
                HttpResponse::internal_error()
            }
        }
    }

    /// GET /app-index...: filtered listing rendered into the page template.
    ///
    /// The filter is parsed from the `k=v&...` tail of the dispatch
    /// segment. Empty values are dropped, unknown keys ignored, and a
    /// non-integer `number` answers 400.
    async fn handle_index(&self, segment: &str) -> HttpResponse {
        let tail = &segment["app-index".len()..];
        let tail = tail.strip_prefix('?').unwrap_or(tail);

        let mut filter = Filter::default();
        for (key, value) in parser::parse_pairs(tail) {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "number" => match value.parse::<u64>() {
                    Ok(id) => filter.id = Some(id),
                    Err(_) => {
                        warn!("rejected non-integer number filter: {value}");
                        return HttpResponse::bad_request();
                    }
                },
                "first" => filter.first = Some(value),
                "last" => filter.last = Some(value),
                _ => {}
            }
        }

        let records = match self.store.query(&filter).await {
            Ok(records) => records,
            Err(e) => {
                error!("app-index store read failed: {e}");
                return HttpResponse::internal_error();
            }
        };

        let template = match tokio::fs::read_to_string(self.www_root.join(LIST_PAGE)).await {
            Ok(template) => template,
            Err(e) => {
                error!("failed to read listing template: {e}");
                return HttpResponse::internal_error();
            }
        };

        let rows: String = records.iter().map(render_row).collect();
        let page = template.replace(ROWS_PLACEHOLDER, &rows);

        HttpResponse::new(StatusCode::Ok)
            .with_content_type("text/html")
            .with_body_string(page)
    }

    async fn serve_page(&self, name: &str) -> HttpResponse {
        match tokio::fs::read(self.www_root.join(name)).await {
            Ok(bytes) => HttpResponse::new(StatusCode::Ok)
                .with_content_type("text/html")
                .with_body_bytes(bytes),
            Err(e) => {
                error!("failed to read page {name}: {e}");
                HttpResponse::internal_error()
            }
        }
    }
}
