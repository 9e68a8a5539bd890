use crate::{
    annotation::AnnotationKind, dna_sequence::DNAsequence, document::Document,
    error::CloningError,
};

/// Strips the ligation bookkeeping from a finished product: part annotations
/// go and the description is cleared.
pub fn cleanup_annotations(document: Document) -> Result<DNAsequence, CloningError> {
    let mut dna = document.into_nucleotide()?;
    dna.remove_annotations_of_kind(&AnnotationKind::ConcatenatedSequence);
    dna.set_description("");
    Ok(dna)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        annotation::{Annotation, Direction, Interval},
        error::ErrorCode,
    };

    #[test]
    fn test_cleanup() {
        let mut dna = DNAsequence::new("A+B", "ACCTAAAAGGGG");
        dna.set_description("Ligation of A and B");
        dna.add_annotation(
            Annotation::new("A", AnnotationKind::ConcatenatedSequence)
                .with_interval(Interval::new(1, 8, Direction::LeftToRight)),
        );
        dna.add_annotation(
            Annotation::new("gene", AnnotationKind::Other("gene".to_string()))
                .with_interval(Interval::new(5, 8, Direction::LeftToRight)),
        );
        let clean = cleanup_annotations(Document::from(dna)).unwrap();
        assert_eq!(clean.description(), "");
        assert_eq!(clean.annotations().len(), 1);
        assert_eq!(clean.annotations()[0].name, "gene");
        assert_eq!(clean.get_forward_string(), "ACCTAAAAGGGG");
    }

    #[test]
    fn test_cleanup_needs_nucleotide() {
        let doc = Document::SequenceList {
            name: "list".to_string(),
            sequences: vec![],
        };
        assert_eq!(
            cleanup_annotations(doc).unwrap_err().code,
            ErrorCode::Conversion
        );
    }
}
