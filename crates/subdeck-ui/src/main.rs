#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! SubDeck UI wasm entry point and native stub fallback.

#[cfg(target_arch = "wasm32")]
fn main() -> Result<(), std::io::Error> {
    subdeck_ui::run_app();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
const NATIVE_NOTICE: &str = "SubDeck renders in the browser only.
Build it with `cargo build -p subdeck-ui --release --target wasm32-unknown-unknown`,
then serve the bundle from a page whose <body> carries the `data-subdeck-config` JSON
(base_url, request_timeout_ms, toast_duration_ms).
";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), std::io::Error> {
    use std::io::{self, Write};

    io::stderr().lock().write_all(NATIVE_NOTICE.as_bytes())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_main_writes_build_notice() -> std::io::Result<()> {
        assert!(NATIVE_NOTICE.contains("wasm32-unknown-unknown"));
        assert!(NATIVE_NOTICE.contains("data-subdeck-config"));
        main()
    }
}
