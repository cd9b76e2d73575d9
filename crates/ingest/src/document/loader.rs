use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use reportlens_core::{Document, DocumentMetadata};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{extract_year, LoadError, PageExtractor, PlainPdfExtractor, RawPage, TableAwarePdfExtractor};

/// Loads per-company annual-report PDFs from `<root>/<company>/*.pdf`.
pub struct DocumentLoader {
    root: PathBuf,
    companies: Vec<String>,
    strategies: Vec<Box<dyn PageExtractor>>,
}

impl DocumentLoader {
    /// Loader with the default strategy order: table-aware first, then plain.
    pub fn new(root: impl Into<PathBuf>, companies: Vec<String>) -> Self {
        Self::with_strategies(
            root,
            companies,
            vec![Box::new(TableAwarePdfExtractor), Box::new(PlainPdfExtractor)],
        )
    }

    pub fn with_strategies(
        root: impl Into<PathBuf>,
        companies: Vec<String>,
        strategies: Vec<Box<dyn PageExtractor>>,
    ) -> Self {
        Self {
            root: root.into(),
            companies,
            strategies,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    /// Load every company in order. Errors when nothing at all was loaded.
    pub fn load_all(&self) -> Result<Vec<Document>, LoadError> {
        let mut all = Vec::new();
        for company in &self.companies {
            all.extend(self.load_company(company)?);
        }
        info!(documents = all.len(), "Loaded all companies");
        if all.is_empty() {
            return Err(LoadError::NoDocuments(self.root.clone()));
        }
        Ok(all)
    }

    /// One `Document` per extracted page across all PDFs of a company.
    /// A missing directory or unreadable file is logged and skipped.
    pub fn load_company(&self, company: &str) -> Result<Vec<Document>, LoadError> {
        let dir = self.root.join(company);
        if !dir.is_dir() {
            warn!(company, dir = %dir.display(), "Company directory does not exist");
            return Ok(Vec::new());
        }

        let files = list_pdfs(&dir);
        if files.is_empty() {
            warn!(company, dir = %dir.display(), "No PDF files found");
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for path in files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Failed to read PDF, skipping");
                    continue;
                }
            };

            let Some((strategy, pages)) = self.extract_pages(&file_name, &bytes) else {
                warn!(file = %file_name, "All extraction strategies failed, skipping file");
                continue;
            };

            let year = extract_year(&file_name);
            info!(company, file = %file_name, pages = pages.len(), strategy, "Loaded PDF");
            documents.extend(pages.into_iter().map(|page| Document {
                content: page.text,
                metadata: DocumentMetadata {
                    company: company.to_string(),
                    source_file: file_name.clone(),
                    year: year.clone(),
                    page: Some(page.page_number),
                },
            }));
        }
        Ok(documents)
    }

    /// First strategy that yields at least one page.
    fn extract_pages(&self, file_name: &str, bytes: &[u8]) -> Option<(&'static str, Vec<RawPage>)> {
        for strategy in &self.strategies {
            match strategy.extract(bytes) {
                Ok(pages) if !pages.is_empty() => return Some((strategy.name(), pages)),
                Ok(_) => {
                    warn!(file = file_name, strategy = strategy.name(), "Extraction returned no pages");
                }
                Err(e) => {
                    warn!(file = file_name, strategy = strategy.name(), error = %e, "Extraction failed");
                }
            }
        }
        None
    }
}

/// `*.pdf` files (any extension case) directly inside `dir`, sorted by name.
fn list_pdfs(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(error = %err, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

/// Number of PDFs per company, in company order.
pub fn count_pdfs(root: &Path, companies: &[String]) -> Result<IndexMap<String, usize>, LoadError> {
    if !root.is_dir() {
        return Err(LoadError::DataDirMissing(root.to_path_buf()));
    }
    Ok(companies
        .iter()
        .map(|c| (c.clone(), list_pdfs(&root.join(c)).len()))
        .collect())
}
