//! XML payloads of the classification service and their normalized form.
//!
//! A lookup by work identifier answers with a single `<work>` plus
//! `<recommendations>`; a title search answers with a `<works>` list, or a
//! single `<work>` when the title is unambiguous.

use serde::{Deserialize, Serialize};

use crate::db::NewBook;
use crate::error::BookwormError;

#[derive(Debug, Default, Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub work: Option<WorkAttrs>,
    #[serde(default)]
    pub works: Option<Works>,
    #[serde(default)]
    pub recommendations: Option<Recommendations>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Works {
    #[serde(default, rename = "work")]
    pub items: Vec<WorkAttrs>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct WorkAttrs {
    #[serde(rename = "@title", default)]
    pub title: String,
    #[serde(rename = "@author", default)]
    pub author: String,
    #[serde(rename = "@hyr", default)]
    pub hyr: String,
    #[serde(rename = "@owi", default)]
    pub owi: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub ddc: Option<Ddc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Ddc {
    #[serde(default, rename = "mostPopular")]
    pub most_popular: Vec<MostPopular>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MostPopular {
    #[serde(rename = "@sfa", default)]
    pub sfa: String,
}

/// Normalized bibliographic metadata. Never persisted as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographicRecord {
    pub title: String,
    pub author: String,
    pub year: String,
    pub external_id: String,
    /// Most popular DDC number; empty when the service offers none.
    pub classification: String,
}

impl BibliographicRecord {
    /// Adapt into an unsaved book owned by `owner`.
    pub fn into_new_book(self, owner: impl Into<String>) -> NewBook {
        NewBook {
            title: self.title,
            author: self.author,
            classification: self.classification,
            id: self.external_id,
            user: owner.into(),
        }
    }
}

impl From<WorkAttrs> for BibliographicRecord {
    fn from(w: WorkAttrs) -> Self {
        Self {
            title: w.title,
            author: w.author,
            year: w.hyr,
            external_id: w.owi,
            classification: String::new(),
        }
    }
}

impl ClassifyResponse {
    pub fn parse(xml: &str) -> Result<Self, BookwormError> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    fn most_popular(&self) -> String {
        self.recommendations
            .as_ref()
            .and_then(|r| r.ddc.as_ref())
            .and_then(|ddc| ddc.most_popular.first())
            .map(|mp| mp.sfa.trim().to_string())
            .unwrap_or_default()
    }

    /// The single work of an identifier lookup. `requested_id` backs up a missing `owi`.
    pub fn into_record(self, requested_id: &str) -> Result<BibliographicRecord, BookwormError> {
        let classification = self.most_popular();
        let work = self
            .work
            .ok_or_else(|| BookwormError::MissingWork(requested_id.to_string()))?;
        let mut record = BibliographicRecord::from(work);
        if record.external_id.is_empty() {
            record.external_id = requested_id.to_string();
        }
        record.classification = classification;
        Ok(record)
    }

    /// All works of a title search; empty when nothing matched.
    pub fn into_search_results(self) -> Vec<BibliographicRecord> {
        match (self.works, self.work) {
            (Some(works), _) => works.items.into_iter().map(Into::into).collect(),
            (None, Some(work)) => vec![work.into()],
            (None, None) => Vec::new(),
        }
    }
}
