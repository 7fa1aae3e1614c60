//! Password-protected PDF text extraction.
//!
//! Primary path is lopdf (handles the statement's user-password encryption
//! and gives per-page extraction so one broken page doesn't sink the rest).
//! If lopdf fails outright we fall back to pdf-extract over the same file,
//! which copes with some streams lopdf rejects. Diagnostic page/character
//! counts go to the console.

use anyhow::{Context, Result, anyhow};
use lopdf::Document;
use std::path::Path;

/// Extract all text from a statement PDF, trying lopdf first and
/// pdf-extract second. Returns the concatenated page text with
/// `--- Page N ---` markers between pages.
pub fn extract_statement_text(path: impl AsRef<Path>, password: &str) -> Result<String> {
    let path = path.as_ref();
    match extract_with_lopdf(path, password) {
        Ok(text) => Ok(text),
        Err(err) => {
            eprintln!("lopdf extraction failed: {err:#}");
            println!("Trying pdf-extract fallback...");
            extract_with_pdf_extract(path)
        }
    }
}

fn extract_with_lopdf(path: &Path, password: &str) -> Result<String> {
    let mut doc =
        Document::load(path).with_context(|| format!("loading {}", path.display()))?;

    if doc.is_encrypted() {
        println!("PDF is encrypted, attempting to decrypt...");
        doc.decrypt(password)
            .context("decrypting PDF with provided password")?;
    }

    let pages = doc.get_pages();
    println!("PDF has {} pages", pages.len());

    let mut text = String::new();
    for &page_num in pages.keys() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => {
                println!(
                    "Extracted {} characters from page {}",
                    page_text.chars().count(),
                    page_num
                );
                text.push_str(&format!("--- Page {} ---\n", page_num));
                text.push_str(&page_text);
                text.push_str("\n\n");
            }
            Err(err) => {
                eprintln!("Error extracting text from page {}: {}", page_num, err);
                continue;
            }
        }
    }

    if text.trim().is_empty() {
        return Err(anyhow!("lopdf produced no text"));
    }
    Ok(text)
}

fn extract_with_pdf_extract(path: &Path) -> Result<String> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| anyhow!("pdf-extract failed on {}: {}", path.display(), e))?;
    println!("pdf-extract recovered {} characters", text.chars().count());
    if text.trim().is_empty() {
        return Err(anyhow!("pdf-extract produced no text"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_an_error() {
        let err = extract_statement_text("/nonexistent/statement.pdf", "pw").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("statement.pdf"), "unexpected error: {msg}");
    }
}
