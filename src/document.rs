use crate::{
    dna_sequence::DNAsequence,
    error::{CloningError, ErrorCode},
    iupac_code::IupacCode,
};
use bio::io::fasta;
use gb_io::seq::Seq;
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Document {
    Nucleotide(DNAsequence),
    SequenceList {
        name: String,
        sequences: Vec<DNAsequence>,
    },
    /// Anything that is not a nucleotide sequence, e.g. a protein record.
    Other { name: String, kind: String },
}

impl Document {
    pub fn name(&self) -> &str {
        match self {
            Self::Nucleotide(dna) => dna.name(),
            Self::SequenceList { name, .. } => name,
            Self::Other { name, .. } => name,
        }
    }

    pub fn nucleotide(&self) -> Result<&DNAsequence, CloningError> {
        match self {
            Self::Nucleotide(dna) => Ok(dna),
            _ => Err(CloningError::conversion(self.name())),
        }
    }

    pub fn into_nucleotide(self) -> Result<DNAsequence, CloningError> {
        match self {
            Self::Nucleotide(dna) => Ok(dna),
            other => Err(CloningError::conversion(other.name())),
        }
    }

    pub fn flatten(self) -> Result<Vec<DNAsequence>, CloningError> {
        match self {
            Self::Nucleotide(dna) => Ok(vec![dna]),
            Self::SequenceList { sequences, .. } => Ok(sequences),
            Self::Other { name, .. } => Err(CloningError::conversion(&name)),
        }
    }

    pub fn is_nucleotide(&self) -> bool {
        !matches!(self, Self::Other { .. })
    }

    fn from_genbank_seq(seq: Seq) -> Self {
        let is_protein = seq
            .molecule_type
            .as_deref()
            .map(|m| m.eq_ignore_ascii_case("aa") || m.eq_ignore_ascii_case("protein"))
            .unwrap_or(false);
        if is_protein || !IupacCode::is_nucleotide_sequence(&seq.seq) {
            let name = seq.name.clone().unwrap_or_default();
            return Self::Other {
                name,
                kind: "protein".to_string(),
            };
        }
        Self::Nucleotide(DNAsequence::from_genbank_seq(seq))
    }

    fn from_fasta_record(record: &fasta::Record) -> Self {
        if IupacCode::is_nucleotide_sequence(record.seq()) {
            Self::Nucleotide(DNAsequence::from_fasta_record(record))
        } else {
            Self::Other {
                name: record.id().to_string(),
                kind: "protein".to_string(),
            }
        }
    }

    fn from_records(path: &str, mut documents: Vec<Document>) -> Result<Self, CloningError> {
        match documents.len() {
            0 => Err(CloningError::new(
                ErrorCode::InvalidInput,
                format!("No sequence records in '{path}'"),
            )),
            1 => Ok(documents.remove(0)),
            _ => {
                let name = Path::new(path)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.to_string());
                if let Some(other) = documents.iter().find(|d| !d.is_nucleotide()) {
                    return Err(CloningError::conversion(other.name()));
                }
                let sequences = documents
                    .into_iter()
                    .map(Document::into_nucleotide)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::SequenceList { name, sequences })
            }
        }
    }

    /// Loads a GenBank or FASTA file, picked by extension.
    pub fn load_from_file(path: &str) -> Result<Self, CloningError> {
        let extension = Path::new(path)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let documents = match extension.as_str() {
            "fa" | "fasta" | "fna" | "fas" => {
                let file = File::open(path)?;
                fasta::Reader::new(file)
                    .records()
                    .map(|record| {
                        record.map(|r| Self::from_fasta_record(&r)).map_err(|e| {
                            CloningError::new(
                                ErrorCode::InvalidInput,
                                format!("Could not parse FASTA file '{path}': {e}"),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            _ => gb_io::reader::parse_file(path)
                .map_err(|e| {
                    CloningError::new(
                        ErrorCode::InvalidInput,
                        format!("Could not parse GenBank file '{path}': {e}"),
                    )
                })?
                .into_iter()
                .map(Self::from_genbank_seq)
                .collect(),
        };
        Self::from_records(path, documents)
    }
}

impl From<DNAsequence> for Document {
    fn from(dna: DNAsequence) -> Self {
        Self::Nucleotide(dna)
    }
}
