use crate::{
    annotation::AnnotationKind, dna_sequence::DNAsequence, document::Document,
    error::CloningError, restriction_enzyme::RestrictionEnzyme,
};
use tracing::debug;

pub fn has_recognition_site(enzyme: &RestrictionEnzyme, dna: &DNAsequence) -> bool {
    dna.annotations_of_kind(&AnnotationKind::RestrictionSite)
        .any(|a| a.name.eq_ignore_ascii_case(&enzyme.name))
}

/// Expands digest documents into their sequences, in order, keeping only
/// those without a site of `enzyme`.
pub fn select_needed_sequences(
    enzyme: &RestrictionEnzyme,
    documents: Vec<Document>,
) -> Result<Vec<DNAsequence>, CloningError> {
    let mut ret = vec![];
    for document in documents {
        for dna in document.flatten()? {
            if has_recognition_site(enzyme, &dna) {
                debug!("Dropping '{}': still has a {} site", dna.name(), enzyme.name);
                continue;
            }
            ret.push(dna);
        }
    }
    Ok(ret)
}
