//! File-to-file compilation.

use std::path::Path;
use std::time::Instant;

use crate::error::GridError;
use crate::html::RenderOptions;
use crate::parser::parse;

/// Compile a grid source file into an HTML page.
///
/// When `live_server_address` is set, the page carries the live reload
/// script pointing at that server.
///
/// # Errors
///
/// Returns [`GridError::Read`] or [`GridError::Write`] on I/O failure.
/// Syntax problems never fail compilation; they are rendered into the page.
pub fn compile_file(
    input: &Path,
    output: &Path,
    live_server_address: Option<&str>,
) -> Result<(), GridError> {
    let start = Instant::now();

    let source = std::fs::read_to_string(input).map_err(|source| GridError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let options = RenderOptions {
        live_server_address: live_server_address.map(ToOwned::to_owned),
    };
    let html = parse(&source).to_html(&options);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| GridError::Write {
            path: output.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(output, html).map_err(|source| GridError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Compiled grid"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_file_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("song.mmd");
        let output = dir.path().join("out/index.html");
        std::fs::write(&input, "# Song\n| C | G |\n").unwrap();

        compile_file(&input, &output, None).unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("<h1>Song</h1>"));
        assert!(html.contains(r#"<div class="grid-row">"#));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_compile_file_with_live_server() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("song.mmd");
        let output = dir.path().join("index.html");
        std::fs::write(&input, "| C |\n").unwrap();

        compile_file(&input, &output, Some("http://127.0.0.1:8001")).unwrap();

        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains(r#"var server_address = "http://127.0.0.1:8001";"#));
    }

    #[test]
    fn test_compile_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = compile_file(
            &dir.path().join("missing.mmd"),
            &dir.path().join("index.html"),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, GridError::Read { .. }));
        assert!(err.to_string().contains("missing.mmd"));
    }
}
