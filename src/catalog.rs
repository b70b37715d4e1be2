//! # Case Catalog Module
//!
//! The catalog is the immutable list of teaching cases, loaded once from a
//! JSON file at startup. Lookups come from user-controlled input (button
//! payloads and typed numbers), so they return `Option` and never panic.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::CatalogLoadError;

/// A multiple-choice question attached to a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    pub answer_index: usize,
}

impl Quiz {
    /// Text of the correct option
    pub fn correct_option(&self) -> &str {
        // answer_index is validated at load time
        &self.options[self.answer_index]
    }

    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.answer_index
    }
}

/// One teaching example: an ECG image, a description and a quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: u32,
    pub title: String,
    #[serde(alias = "short_description")]
    pub description: String,
    /// Image path relative to the catalog file
    pub image: PathBuf,
    pub quiz: Quiz,
}

/// Immutable in-memory collection of all cases
#[derive(Debug, Clone)]
pub struct Catalog {
    cases: Vec<Case>,
    by_id: HashMap<u32, usize>,
    base_dir: PathBuf,
}

impl Catalog {
    /// Load and validate the catalog file.
    ///
    /// Image paths are resolved against the directory containing the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogLoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let catalog = Self::from_json(&content, base_dir)?;
        info!(path = %path.display(), cases = catalog.len(), "Case catalog loaded");
        Ok(catalog)
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str, base_dir: impl Into<PathBuf>) -> Result<Self, CatalogLoadError> {
        let cases: Vec<Case> = serde_json::from_str(json)?;
        Self::from_cases(cases, base_dir)
    }

    /// Build a catalog from already-parsed cases, enforcing every invariant
    pub fn from_cases(
        cases: Vec<Case>,
        base_dir: impl Into<PathBuf>,
    ) -> Result<Self, CatalogLoadError> {
        if cases.is_empty() {
            return Err(CatalogLoadError::Empty);
        }

        let mut by_id = HashMap::with_capacity(cases.len());
        for (position, case) in cases.iter().enumerate() {
            validate_case(case)?;
            if by_id.insert(case.id, position).is_some() {
                return Err(invalid(case.id, "duplicate id"));
            }
        }

        // Typed case numbers map straight onto ids, so ids must be 1..=n
        let expected: HashSet<u32> = (1..=cases.len() as u32).collect();
        if let Some(stray) = cases.iter().find(|c| !expected.contains(&c.id)) {
            return Err(invalid(
                stray.id,
                &format!("ids must cover 1..={} without gaps", cases.len()),
            ));
        }

        debug!(cases = cases.len(), "Catalog validated");

        Ok(Self {
            cases,
            by_id,
            base_dir: base_dir.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Case> {
        self.cases.iter()
    }

    /// Find a case by id
    pub fn lookup(&self, id: u32) -> Option<&Case> {
        self.by_id.get(&id).map(|&position| &self.cases[position])
    }

    /// Cases shown on one page of the case list.
    ///
    /// Pages past the end yield an empty slice rather than an error.
    pub fn page(&self, page_index: usize, page_size: usize) -> &[Case] {
        let start = page_index.saturating_mul(page_size).min(self.cases.len());
        let end = start.saturating_add(page_size).min(self.cases.len());
        &self.cases[start..end]
    }

    /// Whether any case follows the given page
    pub fn has_next_page(&self, page_index: usize, page_size: usize) -> bool {
        page_index
            .saturating_add(1)
            .saturating_mul(page_size)
            < self.cases.len()
    }

    /// Pick a case uniformly at random
    pub fn random_case<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Case> {
        self.cases.choose(rng)
    }

    /// Absolute (or working-directory relative) path of a case image
    pub fn image_path(&self, case: &Case) -> PathBuf {
        self.base_dir.join(&case.image)
    }
}

fn invalid(case_id: u32, reason: &str) -> CatalogLoadError {
    CatalogLoadError::InvalidCase {
        case_id,
        reason: reason.to_string(),
    }
}

fn validate_case(case: &Case) -> Result<(), CatalogLoadError> {
    if case.id == 0 {
        return Err(invalid(case.id, "ids start at 1"));
    }
    if case.title.trim().is_empty() {
        return Err(invalid(case.id, "empty title"));
    }
    if case.image.as_os_str().is_empty() {
        return Err(invalid(case.id, "empty image path"));
    }

    let quiz = &case.quiz;
    if quiz.question.trim().is_empty() {
        return Err(invalid(case.id, "empty quiz question"));
    }
    if quiz.options.len() < 2 {
        return Err(invalid(case.id, "quiz needs at least two options"));
    }
    if quiz.options.iter().any(|option| option.trim().is_empty()) {
        return Err(invalid(case.id, "empty quiz option"));
    }
    if quiz.answer_index >= quiz.options.len() {
        return Err(invalid(
            case.id,
            &format!(
                "answer_index {} out of range for {} options",
                quiz.answer_index,
                quiz.options.len()
            ),
        ));
    }

    Ok(())
}
