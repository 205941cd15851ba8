//! Dashboard page files, compiled into the binary.

pub struct StaticFile {
    pub content_type: &'static str,
    pub body: &'static str,
}

macro_rules! dashboard_file {
    ($name:literal, $content_type:literal) => {
        StaticFile {
            content_type: $content_type,
            body: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/web/assets/", $name)),
        }
    };
}

pub const INDEX: StaticFile = dashboard_file!("index.html", "text/html; charset=utf-8");
pub const STYLES: StaticFile = dashboard_file!("styles.css", "text/css; charset=utf-8");
pub const SCRIPT: StaticFile = dashboard_file!("app.js", "application/javascript; charset=utf-8");
