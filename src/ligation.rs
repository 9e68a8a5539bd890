use crate::{
    annotation::{Annotation, AnnotationKind, Direction, Interval},
    dna_sequence::DNAsequence,
    error::CloningError,
    host::{LigationOptions, LigationPrimitive},
    overhangs::{FlankingOverhangs, Terminus, flanking_overhangs},
};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
pub struct StickyEndLigation;

impl StickyEndLigation {
    /// Width of the junction when the end of `left` pairs with the start of
    /// `right`.
    fn junction(left: &FlankingOverhangs, right: &FlankingOverhangs) -> Option<usize> {
        let end = left.at(Terminus::End)?;
        let start = right.at(Terminus::Start)?;
        (end.is_complementary(start) && end.len() == start.len()).then(|| end.len())
    }

    fn is_overhang_at(annotation: &Annotation, position: usize) -> bool {
        annotation.is_kind(&AnnotationKind::Overhang)
            && annotation
                .intervals
                .iter()
                .any(|i| i.min_index() == position || i.max_index() == position)
    }

    fn shifted(interval: &Interval, shift: usize, total: Option<usize>) -> Vec<Interval> {
        let lo = interval.min_index() + shift;
        let hi = interval.max_index() + shift;
        match total {
            Some(total) if lo > total => vec![interval.with_span(lo - total, hi - total)],
            Some(total) if hi > total => {
                let head = interval.with_span(lo, total);
                let tail = interval.with_span(1, hi - total);
                match interval.direction() {
                    Direction::LeftToRight => vec![head, tail],
                    Direction::RightToLeft => vec![tail, head],
                }
            }
            _ => vec![interval.with_span(lo, hi)],
        }
    }

    fn shifted_annotation(annotation: &Annotation, shift: usize, total: Option<usize>) -> Annotation {
        let mut ret = annotation.clone();
        ret.intervals = annotation
            .intervals
            .iter()
            .flat_map(|i| Self::shifted(i, shift, total))
            .collect();
        ret
    }

    fn part(name: &str, from: usize, len: usize, total: Option<usize>) -> Annotation {
        let mut ret = Annotation::new(name, AnnotationKind::ConcatenatedSequence);
        ret.intervals = Self::shifted(&Interval::new(1, len, Direction::LeftToRight), from - 1, total);
        ret
    }

    fn product(left: &DNAsequence, right: &DNAsequence, bases: &[u8]) -> DNAsequence {
        let mut product = DNAsequence::new(
            &format!("{}+{}", left.name(), right.name()),
            &String::from_utf8_lossy(bases),
        );
        product.set_description(&format!("Ligation of {} and {}", left.name(), right.name()));
        product
    }

    fn join(left: &DNAsequence, right: &DNAsequence, width: usize) -> DNAsequence {
        let shift = left.len() - width;
        let mut bases = left.forward().to_vec();
        bases.extend_from_slice(&right.forward()[width..]);
        let mut product = Self::product(left, right, &bases);

        let mut annotations: Vec<Annotation> = left
            .annotations()
            .iter()
            .filter(|a| !Self::is_overhang_at(a, left.len()))
            .cloned()
            .collect();
        annotations.extend(
            right
                .annotations()
                .iter()
                .filter(|a| !Self::is_overhang_at(a, 1))
                .map(|a| Self::shifted_annotation(a, shift, None)),
        );
        annotations.push(Self::part(left.name(), 1, left.len(), None));
        annotations.push(Self::part(right.name(), shift + 1, right.len(), None));
        product.set_annotations(annotations);
        product
    }

    /// Closes `left` and `right` into a ring. `width_lr` is the junction
    /// after `left`, `width_rl` the one after `right`.
    fn circularize(
        left: &DNAsequence,
        right: &DNAsequence,
        width_lr: usize,
        width_rl: usize,
    ) -> Option<DNAsequence> {
        if right.len() < width_lr + width_rl {
            return None;
        }
        let shift = left.len() - width_lr;
        let mut bases = left.forward().to_vec();
        bases.extend_from_slice(&right.forward()[width_lr..right.len() - width_rl]);
        let total = bases.len();
        let mut product = Self::product(left, right, &bases);
        product.set_circular(true);

        let mut annotations: Vec<Annotation> = left
            .annotations()
            .iter()
            .filter(|a| !Self::is_overhang_at(a, 1) && !Self::is_overhang_at(a, left.len()))
            .cloned()
            .collect();
        annotations.extend(
            right
                .annotations()
                .iter()
                .filter(|a| !Self::is_overhang_at(a, 1) && !Self::is_overhang_at(a, right.len()))
                .map(|a| Self::shifted_annotation(a, shift, Some(total))),
        );
        annotations.push(Self::part(left.name(), 1, left.len(), Some(total)));
        annotations.push(Self::part(right.name(), shift + 1, right.len(), Some(total)));
        product.set_annotations(annotations);
        Some(product)
    }
}

impl LigationPrimitive for StickyEndLigation {
    fn ligate(
        &self,
        options: &LigationOptions,
        documents: [&DNAsequence; 2],
    ) -> Result<Vec<DNAsequence>, CloningError> {
        let [first, second] = documents;
        let a = flanking_overhangs(first)?;
        let b = flanking_overhangs(second)?;
        let forward = Self::junction(&a, &b);
        let backward = Self::junction(&b, &a);

        if options.circular {
            if let (Some(w1), Some(w2)) = (forward, backward) {
                return Ok(Self::circularize(first, second, w1, w2).into_iter().collect());
            }
            debug!(
                "{} and {} cannot close into a ring, joining linearly",
                first.name(),
                second.name()
            );
        }

        let mut products = vec![];
        if let Some(width) = forward {
            products.push(Self::join(first, second, width));
        }
        if let Some(width) = backward {
            products.push(Self::join(second, first, width));
        }
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotation::QUALIFIER_SEQUENCE, error::ErrorCode};

    fn fragment(name: &str, bases: &str) -> DNAsequence {
        let mut dna = DNAsequence::new(name, bases);
        let n = dna.len();
        dna.add_annotation(
            Annotation::new("5' overhang", AnnotationKind::Overhang)
                .with_interval(Interval::new(1, 4, Direction::LeftToRight))
                .with_qualifier(QUALIFIER_SEQUENCE, &bases[..4]),
        );
        dna.add_annotation(
            Annotation::new("5' overhang", AnnotationKind::Overhang)
                .with_interval(Interval::new(n - 3, n, Direction::RightToLeft))
                .with_qualifier(QUALIFIER_SEQUENCE, &bases[n - 4..]),
        );
        dna
    }

    fn linear() -> LigationOptions {
        LigationOptions { circular: false }
    }

    #[test]
    fn test_linear_join() {
        let a = fragment("A", "ACCTTTTTTTTTAACA");
        let b = fragment("B", "AACAGGGGGGGGTGCC");
        let products = StickyEndLigation.ligate(&linear(), [&a, &b]).unwrap();
        assert_eq!(products.len(), 1);
        let ab = &products[0];
        assert_eq!(ab.get_forward_string(), "ACCTTTTTTTTTAACAGGGGGGGGTGCC");
        assert!(!ab.is_circular());
        assert_eq!(ab.name(), "A+B");

        let flanks = flanking_overhangs(ab).unwrap();
        assert_eq!(flanks.at(Terminus::Start).unwrap().sequence(), "ACCT");
        assert_eq!(flanks.at(Terminus::End).unwrap().sequence(), "TGCC");
        assert_eq!(
            ab.annotations_of_kind(&AnnotationKind::Overhang).count(),
            2
        );

        let parts: Vec<_> = ab
            .annotations_of_kind(&AnnotationKind::ConcatenatedSequence)
            .collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].intervals, vec![Interval::new(13, 28, Direction::LeftToRight)]);
    }

    #[test]
    fn test_order_follows_the_overhangs() {
        let a = fragment("A", "ACCTTTTTTTTTAACA");
        let b = fragment("B", "AACAGGGGGGGGTGCC");
        let products = StickyEndLigation.ligate(&linear(), [&b, &a]).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name(), "A+B");
    }

    #[test]
    fn test_circular_close() {
        let mut vector = fragment("vector", "GCAGTTTTTTTTACCT");
        vector.add_annotation(
            Annotation::new("ori", AnnotationKind::Other("rep_origin".to_string()))
                .with_interval(Interval::new(5, 12, Direction::LeftToRight)),
        );
        let mut insert = fragment("insert", "ACCTGGGGGGGGGCAG");
        insert.add_annotation(
            Annotation::new("gene", AnnotationKind::Other("gene".to_string()))
                .with_interval(Interval::new(5, 12, Direction::RightToLeft)),
        );
        let options = LigationOptions { circular: true };
        let products = StickyEndLigation.ligate(&options, [&vector, &insert]).unwrap();
        assert_eq!(products.len(), 1);
        let ring = &products[0];
        assert!(ring.is_circular());
        assert_eq!(ring.get_forward_string(), "GCAGTTTTTTTTACCTGGGGGGGG");
        assert_eq!(ring.annotations_of_kind(&AnnotationKind::Overhang).count(), 0);

        let gene = ring.annotations().iter().find(|a| a.name == "gene").unwrap();
        assert_eq!(gene.intervals, vec![Interval::new(17, 24, Direction::RightToLeft)]);
        let parts: Vec<_> = ring
            .annotations_of_kind(&AnnotationKind::ConcatenatedSequence)
            .collect();
        assert_eq!(
            parts[1].intervals,
            vec![
                Interval::new(13, 24, Direction::LeftToRight),
                Interval::new(1, 4, Direction::LeftToRight)
            ]
        );
    }

    #[test]
    fn test_both_orders_without_circular_intent() {
        let vector = fragment("vector", "GCAGTTTTTTTTACCT");
        let insert = fragment("insert", "ACCTGGGGGGGGGCAG");
        let products = StickyEndLigation.ligate(&linear(), [&vector, &insert]).unwrap();
        assert_eq!(products.len(), 2);
    }

    #[test]
    fn test_no_fit() {
        let a = fragment("A", "ACCTTTTTTTTTAACA");
        let c = fragment("C", "TGCCGGGGGGGGGCAG");
        assert!(StickyEndLigation.ligate(&linear(), [&a, &c]).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_input() {
        let a = fragment("A", "ACCTTTTTTTTTAACA");
        let plain = DNAsequence::new("plain", "ACGT");
        let err = StickyEndLigation.ligate(&linear(), [&a, &plain]).unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedOverhangs);
    }
}
