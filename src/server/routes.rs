use crate::data::Catalog;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

pub fn route_request(catalog: &Catalog, method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/api/health") => match api::health_payload(catalog) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/bases") => match api::bases_payload(catalog) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/derive") => match api::derive_payload(catalog, body) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(400, "Bad Request", &err.to_string()),
        },
        ("POST", "/api/export") => match api::export_payload(catalog, body) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(400, "Bad Request", &err.to_string()),
        },
        ("POST", "/api/import") => match api::import_payload(body) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(400, "Bad Request", &err.to_string()),
        },
        (_, "/api/health" | "/api/bases" | "/api/derive" | "/api/export" | "/api/import") => {
            error_response(405, "Method Not Allowed", "Method not allowed")
        }
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
