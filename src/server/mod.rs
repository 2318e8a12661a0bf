use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use tracing::{debug, info, warn};

use crate::data::Catalog;

pub mod api;
pub mod routes;

pub fn run_server(bind_addr: &str, catalog: &Catalog) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    info!("mountforge server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, catalog) {
                    warn!("request error: {err}");
                }
            }
            Err(err) => warn!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, catalog: &Catalog) -> std::io::Result<()> {
    let mut buffer = [0_u8; 16_384];
    let bytes_read = stream.read(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..bytes_read]);
    let mut lines = request.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let body = request
        .split("\r\n\r\n")
        .nth(1)
        .or_else(|| request.split("\n\n").nth(1))
        .unwrap_or("");

    let response = routes::route_request(catalog, method, path, body);
    debug!(method, path, status = response.status_code, "handled request");
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}
