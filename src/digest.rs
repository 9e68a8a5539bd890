use crate::{
    annotation::{Annotation, AnnotationKind, Direction, Interval, QUALIFIER_RECOGNITION_PATTERN},
    dna_sequence::DNAsequence,
    document::Document,
    error::CloningError,
    executor::{OwningThread, run_and_wait},
    host::DigestPrimitive,
    restriction_enzyme::RestrictionEnzyme,
};
use std::sync::Arc;
use tracing::debug;

fn site_intervals(offset: usize, site_len: usize, n: usize, direction: Direction) -> Vec<Interval> {
    if offset + site_len <= n {
        return vec![Interval::new(offset + 1, offset + site_len, direction)];
    }
    let head = Interval::new(offset + 1, n, direction);
    let tail = Interval::new(1, offset + site_len - n, direction);
    match direction {
        Direction::LeftToRight => vec![head, tail],
        Direction::RightToLeft => vec![tail, head],
    }
}

/// Replaces all restriction-site annotations of `dna` with one per site of
/// `enzyme`: forward hits read left to right, reverse hits right to left.
/// A site across the origin gets two intervals. Returns the number of sites.
pub fn annotate_recognition_sites(enzyme: &RestrictionEnzyme, dna: &mut DNAsequence) -> usize {
    dna.remove_annotations_of_kind(&AnnotationKind::RestrictionSite);
    let site_len = enzyme.recognition_len();
    let n = dna.len();
    let sites = enzyme.get_sites(dna);
    for site in &sites {
        let direction = match site.forward_strand {
            true => Direction::LeftToRight,
            false => Direction::RightToLeft,
        };
        let mut annotation = Annotation::new(&enzyme.name, AnnotationKind::RestrictionSite)
            .with_qualifier(QUALIFIER_RECOGNITION_PATTERN, &enzyme.pattern);
        annotation.intervals = site_intervals(site.offset, site_len, n, direction);
        dna.add_annotation(annotation);
    }
    sites.len()
}

/// Annotates a copy of `document` and cuts it. The digest options are built
/// on the owning thread; the cut itself runs here.
pub fn cut_sequence(
    enzyme: &RestrictionEnzyme,
    document: &Document,
    digester: &Arc<dyn DigestPrimitive>,
    owner: &dyn OwningThread,
) -> Result<Vec<Document>, CloningError> {
    let mut dna = document.nucleotide()?.clone();
    let found = annotate_recognition_sites(enzyme, &mut dna);
    debug!("{}: {found} {} site(s)", dna.name(), enzyme.name);

    let options = {
        let digester = Arc::clone(digester);
        let enzyme = enzyme.clone();
        let dna = dna.clone();
        run_and_wait(owner, move || digester.digest_options(&enzyme, &dna))??
    };
    digester.digest(&options, &dna)
}
