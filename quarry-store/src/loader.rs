//! Document loading: raw files in, tagged text records out.
//!
//! Supports plain text (`.txt`) and Word documents (`.docx`). Each loaded
//! file becomes one [`DocumentRecord`] tagged with the file's basename as
//! provenance. Files with other extensions are logged and skipped, matching
//! the behavior callers expect from a best-effort corpus sweep.
//!
//! Loads fan out concurrently, each file being an independent read with no
//! shared mutable state, and results come back in the caller's path order
//! so downstream chunking stays deterministic.

use crate::error::{Result, StoreError};
use futures::future;
use quarry_context::{DocumentRecord, Provenance};
use regex::Regex;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Load every supported file into a document record, concurrently.
///
/// Unsupported extensions are skipped with a warning; read failures and
/// unparsable `.docx` containers fail the whole load.
pub async fn load_documents(paths: &[PathBuf]) -> Result<Vec<DocumentRecord>> {
    let loads = paths.iter().map(|path| load_document(path));
    let loaded = future::try_join_all(loads).await?;
    Ok(loaded.into_iter().flatten().collect())
}

async fn load_document(path: &Path) -> Result<Option<DocumentRecord>> {
    let text = match path.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => load_text_file(path).await?,
        Some("docx") => load_docx_file(path).await?,
        _ => {
            tracing::warn!("skipping {}: unsupported extension", path.display());
            return Ok(None);
        }
    };

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Some(DocumentRecord::new(text, Provenance::new(filename))))
}

async fn load_text_file(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path).await?;
    Ok(flatten_newlines(&raw))
}

async fn load_docx_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await?;
    let text = extract_docx_text(&bytes).map_err(|message| StoreError::DocumentParse {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(text.trim().to_string())
}

/// Collapse line breaks to single spaces, so a document reads as one
/// continuous text for fixed-window chunking.
fn flatten_newlines(raw: &str) -> String {
    raw.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Pull the plain text out of a `.docx` container.
///
/// A `.docx` file is a zip archive whose body text lives in
/// `word/document.xml` as `<w:t>` runs grouped into `<w:p>` paragraphs.
/// Paragraph ends become newlines; everything else is markup we drop.
fn extract_docx_text(bytes: &[u8]) -> std::result::Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("not a zip archive: {e}"))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| format!("missing word/document.xml: {e}"))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("unreadable word/document.xml: {e}"))?;

    let token = Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|</w:p>")
        .map_err(|e| format!("bad extraction pattern: {e}"))?;

    let mut out = String::new();
    for caps in token.captures_iter(&xml) {
        match caps.get(1) {
            Some(run) => out.push_str(&unescape_xml(run.as_str())),
            None => out.push('\n'),
        }
    }
    Ok(out)
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_flatten_newlines() {
        assert_eq!(flatten_newlines("a\r\nb\nc\rd"), "a b c d");
        assert_eq!(flatten_newlines("no breaks"), "no breaks");
    }

    #[test]
    fn test_extract_docx_text_runs_and_paragraphs() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>
            <w:p><w:r><w:t>Second &amp; last</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = extract_docx_text(&docx_bytes(xml)).unwrap();
        assert_eq!(text.trim(), "Hello world\nSecond & last");
    }

    #[test]
    fn test_extract_docx_text_rejects_non_zip() {
        assert!(extract_docx_text(b"plainly not a zip").is_err());
    }

    #[tokio::test]
    async fn test_load_documents_skips_unsupported_and_tags_filenames() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let txt = dir.path().join("notes.txt");
        let other = dir.path().join("image.png");
        tokio::fs::write(&txt, "line one\nline two").await?;
        tokio::fs::write(&other, [0u8; 4]).await?;

        let documents = load_documents(&[txt, other]).await?;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].text, "line one line two");
        assert_eq!(documents[0].provenance.filename, "notes.txt");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_documents_preserves_path_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        tokio::fs::write(&a, "first").await?;
        tokio::fs::write(&b, "second").await?;

        let documents = load_documents(&[b.clone(), a.clone()]).await?;
        assert_eq!(documents[0].provenance.filename, "b.txt");
        assert_eq!(documents[1].provenance.filename, "a.txt");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_documents_surfaces_missing_file() {
        let missing = PathBuf::from("/definitely/not/here.txt");
        assert!(matches!(
            load_documents(&[missing]).await,
            Err(StoreError::Io { .. })
        ));
    }
}
