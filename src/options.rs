use crate::{
    ENZYMES,
    document::Document,
    error::{CloningError, ErrorCode},
    restriction_enzyme::RestrictionEnzyme,
};
use serde::{Deserialize, Serialize};

/// Parameters of a cloning run as a front end would collect them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloningParameters {
    pub enzyme: String,
    pub min_documents: usize,
    pub max_documents: usize,
}

impl Default for CloningParameters {
    fn default() -> Self {
        Self {
            enzyme: "Eco31I".to_string(),
            min_documents: 2,
            max_documents: 7,
        }
    }
}

impl CloningParameters {
    pub fn load_from_path(path: &str) -> Result<Self, CloningError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CloningError::new(
                ErrorCode::Io,
                format!("Could not read parameter file '{path}': {e}"),
            )
        })?;
        serde_json::from_str(&text).map_err(|e| {
            CloningError::new(
                ErrorCode::InvalidInput,
                format!("Could not parse parameter JSON '{path}': {e}"),
            )
        })
    }

    pub fn resolve_enzyme(&self) -> Result<RestrictionEnzyme, CloningError> {
        ENZYMES.by_name(&self.enzyme)
    }

    pub fn validate_documents(&self, documents: &[Document]) -> Result<(), CloningError> {
        if self.min_documents > self.max_documents {
            return Err(CloningError::new(
                ErrorCode::InvalidInput,
                format!(
                    "min_documents ({}) exceeds max_documents ({})",
                    self.min_documents, self.max_documents
                ),
            ));
        }
        if documents.len() < self.min_documents {
            return Err(CloningError::new(
                ErrorCode::InvalidInput,
                format!(
                    "At least {} documents are needed, got {}",
                    self.min_documents,
                    documents.len()
                ),
            ));
        }
        if documents.len() > self.max_documents {
            return Err(CloningError::new(
                ErrorCode::InvalidInput,
                format!(
                    "At most {} documents can be assembled, got {}",
                    self.max_documents,
                    documents.len()
                ),
            ));
        }
        match documents.iter().find(|d| !d.is_nucleotide()) {
            Some(other) => Err(CloningError::conversion(other.name())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dna_sequence::DNAsequence;
    use std::io::Write;

    fn docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document::from(DNAsequence::new(&format!("d{i}"), "ACGT")))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let params = CloningParameters::default();
        assert_eq!(params.enzyme, "Eco31I");
        assert_eq!(params.resolve_enzyme().unwrap().sequence, "GGTCTC");
    }

    #[test]
    fn test_document_count() {
        let params = CloningParameters::default();
        assert_eq!(
            params.validate_documents(&docs(1)).unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert!(params.validate_documents(&docs(2)).is_ok());
        assert!(params.validate_documents(&docs(7)).is_ok());
        assert!(params.validate_documents(&docs(8)).is_err());
    }

    #[test]
    fn test_non_nucleotide_document() {
        let mut documents = docs(2);
        documents.push(Document::Other {
            name: "GFP".to_string(),
            kind: "protein".to_string(),
        });
        let err = CloningParameters::default()
            .validate_documents(&documents)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conversion);
        assert!(err.message.contains("GFP"));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"enzyme":"BsaI"}}"#).unwrap();
        let params = CloningParameters::load_from_path(file.path().to_str().unwrap()).unwrap();
        assert_eq!(params.enzyme, "BsaI");
        assert_eq!(params.max_documents, 7);

        let err = CloningParameters::load_from_path("/nonexistent/params.json").unwrap_err();
        assert_eq!(err.code, ErrorCode::Io);
    }
}
