//! Shared fixtures for integration tests.

pub mod test_server {
    use std::sync::Once;

    /// Ensures may coroutines are configured only once per test binary.
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}

pub mod fixture {
    use classic_router::config::RoutingConfig;
    use std::fs;
    use std::path::Path;

    /// Routing configuration rooted at a throwaway directory.
    pub fn config_at(root: &Path) -> RoutingConfig {
        RoutingConfig {
            root_dir: root.to_path_buf(),
            app_dir: root.join("app"),
            ..RoutingConfig::default()
        }
    }

    /// Create a controller source file under the application tree,
    /// creating parent directories as needed.
    pub fn controller_file(app_dir: &Path, rel: &str) {
        let path = app_dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "// controller stub\n").unwrap();
    }

    /// Create a directory under the application tree.
    pub fn app_dir(app_dir: &Path, rel: &str) {
        fs::create_dir_all(app_dir.join(rel)).unwrap();
    }

    /// Create a site asset file under the root, creating parents.
    pub fn asset_file(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

pub mod http {
    //! Minimal raw-TCP HTTP client: enough to exercise the wire without
    //! pulling an HTTP client crate into the dev graph.

    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    pub struct RawResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl RawResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }

        pub fn body_str(&self) -> &str {
            std::str::from_utf8(&self.body).unwrap()
        }
    }

    /// Send one request and read one response off the socket. The body is
    /// sized by `Content-Length`, so keep-alive connections don't hang the
    /// read.
    pub fn send_request(
        addr: &SocketAddr,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
    ) -> RawResponse {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        let mut request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n");
        for (name, value) in headers {
            request.push_str(&format!("{name}: {value}\r\n"));
        }
        request.push_str("\r\n");
        stream.write_all(request.as_bytes()).unwrap();

        let mut reader = BufReader::new(stream);
        let mut status_line = String::new();
        reader.read_line(&mut status_line).unwrap();
        let status: u16 = status_line
            .split_whitespace()
            .nth(1)
            .expect("malformed status line")
            .parse()
            .unwrap();

        let mut parsed_headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                parsed_headers.push((name.trim().to_string(), value.trim().to_string()));
            }
        }

        let length: usize = parsed_headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);
        let mut body = vec![0u8; length];
        reader.read_exact(&mut body).unwrap();

        RawResponse {
            status,
            headers: parsed_headers,
            body,
        }
    }
}
