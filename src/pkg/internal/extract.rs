use std::io::Cursor;
use std::path::PathBuf;

use crate::prelude::{Error, Result};

/// Supplies extracted plain text for a document reference. A syntactically
/// valid but empty document yields `Ok("")`; the worker decides what empty
/// text means.
pub trait TextSource: Send + Sync {
    fn exists(&self, name: &str) -> bool;
    fn extract(&self, name: &str) -> Result<String>;
    /// Raw size in bytes, when the backing store knows it.
    fn size(&self, name: &str) -> Option<u64> {
        let _ = name;
        None
    }
}

/// Directory-backed source: PDF and DOCX files under one root, matched by
/// extension.
pub struct DirTextSource {
    root: PathBuf,
}

impl DirTextSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirTextSource { root: root.into() }
    }
}

impl TextSource for DirTextSource {
    fn exists(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }

    fn extract(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(Error::NotFound(format!("document {}", name)));
        }
        let data = std::fs::read(&path).map_err(|e| Error::Extraction(e.to_string()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => extract_text_from_pdf(&data),
            "docx" => extract_text_from_docx(&data),
            "txt" => String::from_utf8(data).map_err(|e| Error::Extraction(e.to_string())),
            other => Err(Error::Extraction(format!("unsupported file type: {}", other))),
        }
    }

    fn size(&self, name: &str) -> Option<u64> {
        std::fs::metadata(self.root.join(name)).ok().map(|m| m.len())
    }
}

fn extract_text_from_pdf(data: &[u8]) -> Result<String> {
    use lopdf::Document;
    let doc = Document::load_from(Cursor::new(data))
        .map_err(|e| Error::Extraction(e.to_string()))?;

    let pages = doc.get_pages();
    let mut text = String::new();
    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push(' ');
            }
            Err(e) => {
                tracing::warn!("failed to extract text from page {}: {}", page_num, e);
            }
        }
    }
    Ok(text.trim().to_string())
}

fn extract_text_from_docx(data: &[u8]) -> Result<String> {
    use docx_rs::read_docx;
    let docx = read_docx(data).map_err(|e| Error::Extraction(e.to_string()))?;
    let mut text = String::new();
    for paragraph in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = paragraph {
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let source = DirTextSource::new("/nonexistent");
        assert!(!source.exists("cv.pdf"));
        assert!(matches!(
            source.extract("cv.pdf"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn unsupported_extension_is_extraction_error() {
        let dir = std::env::temp_dir().join("cvmatch-extract-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cv.png"), b"not a resume").unwrap();
        let source = DirTextSource::new(&dir);
        assert!(matches!(
            source.extract("cv.png"),
            Err(Error::Extraction(_))
        ));
    }

    #[test]
    fn plain_text_passes_through() {
        let dir = std::env::temp_dir().join("cvmatch-extract-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cv.txt"), "rust developer, 5 years").unwrap();
        let source = DirTextSource::new(&dir);
        assert!(source.exists("cv.txt"));
        assert_eq!(source.extract("cv.txt").unwrap(), "rust developer, 5 years");
        assert_eq!(source.size("cv.txt"), Some("rust developer, 5 years".len() as u64));
        assert_eq!(source.size("absent.txt"), None);
    }
}
