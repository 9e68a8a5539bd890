//! Digest and ligation primitives a host can plug in.

use crate::{
    dna_sequence::DNAsequence, document::Document, error::CloningError,
    restriction_enzyme::RestrictionEnzyme,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestOptions {
    pub enzyme: RestrictionEnzyme,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LigationOptions {
    pub circular: bool,
}

pub trait DigestPrimitive: Send + Sync {
    fn digest_options(
        &self,
        enzyme: &RestrictionEnzyme,
        sequence: &DNAsequence,
    ) -> Result<DigestOptions, CloningError>;

    fn digest(
        &self,
        options: &DigestOptions,
        sequence: &DNAsequence,
    ) -> Result<Vec<Document>, CloningError>;
}

pub trait LigationPrimitive: Send + Sync {
    fn ligation_options(
        &self,
        _documents: [&DNAsequence; 2],
    ) -> Result<LigationOptions, CloningError> {
        Ok(LigationOptions::default())
    }

    /// Joins exactly two sequences. More than one product means the join was
    /// ambiguous; none means the ends do not fit.
    fn ligate(
        &self,
        options: &LigationOptions,
        documents: [&DNAsequence; 2],
    ) -> Result<Vec<DNAsequence>, CloningError>;
}
