use crate::{
    annotation::{Annotation, AnnotationKind, Direction, Interval, QUALIFIER_SEQUENCE},
    dna_sequence::DNAsequence,
    error::{CloningError, ErrorCode},
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminus {
    Start,
    End,
}

/// A terminal overhang: a copy of the annotation reduced to its terminal
/// interval, with the `sequence` qualifier set to the bases it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlankingOverhang {
    pub terminus: Terminus,
    pub annotation: Annotation,
}

impl FlankingOverhang {
    pub fn sequence(&self) -> &str {
        self.annotation.qualifier(QUALIFIER_SEQUENCE).unwrap_or_default()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.annotation.interval().map(Interval::direction)
    }

    pub fn len(&self) -> usize {
        self.annotation.interval().map(Interval::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complementary(&self, other: &FlankingOverhang) -> bool {
        match (self.direction(), other.direction()) {
            (Some(a), Some(b)) => {
                a != b && !self.is_empty() && self.sequence().eq_ignore_ascii_case(other.sequence())
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlankingOverhangs([FlankingOverhang; 2]);

impl FlankingOverhangs {
    pub fn iter(&self) -> impl Iterator<Item = &FlankingOverhang> {
        self.0.iter()
    }

    pub fn at(&self, terminus: Terminus) -> Option<&FlankingOverhang> {
        self.0.iter().find(|o| o.terminus == terminus)
    }
}

/// Which end of a sequence of length `seq_len` the interval sits on. The
/// rules are tried in order and the last one that holds decides.
fn classify_interval(interval: &Interval, seq_len: usize) -> Option<Terminus> {
    let len = interval.len();
    if len > seq_len {
        return None;
    }
    let from = interval.from();
    let right = interval.direction().is_directed_right();
    let left = interval.direction().is_directed_left();
    let mut ret = None;
    if from == 1 && right {
        ret = Some(Terminus::Start);
    }
    if from == seq_len && left {
        ret = Some(Terminus::End);
    }
    if from == seq_len - len + 1 && right {
        ret = Some(Terminus::End);
    }
    if from == len && left {
        ret = Some(Terminus::Start);
    }
    ret
}

fn terminal_overhang(annotation: &Annotation, dna: &DNAsequence) -> Option<FlankingOverhang> {
    let n = dna.len();
    let (interval, terminus) = annotation
        .intervals
        .iter()
        .filter_map(|i| classify_interval(i, n).map(|t| (*i, t)))
        .last()?;
    let len = interval.len();
    let bases = match terminus {
        Terminus::Start => &dna.forward()[..len],
        Terminus::End => &dna.forward()[n - len..],
    };
    let mut annotation = annotation.clone();
    annotation.intervals = vec![interval];
    annotation.set_qualifier(QUALIFIER_SEQUENCE, &String::from_utf8_lossy(bases));
    Some(FlankingOverhang {
        terminus,
        annotation,
    })
}

pub fn flanking_overhangs(dna: &DNAsequence) -> Result<FlankingOverhangs, CloningError> {
    let found: Vec<FlankingOverhang> = dna
        .annotations_of_kind(&AnnotationKind::Overhang)
        .filter_map(|a| terminal_overhang(a, dna))
        .collect();
    let count = found.len();
    let pair: [FlankingOverhang; 2] = found.try_into().map_err(|_| {
        CloningError::new(
            ErrorCode::MalformedOverhangs,
            format!(
                "Sequence '{}' has {count} flanking overhang(s), expected 2",
                dna.name()
            ),
        )
    })?;
    Ok(FlankingOverhangs(pair))
}

/// First complementary pair, scanning the insert's overhangs in order and
/// for each of them the destination's. Returns `(insert, destination)`.
pub fn overhangs_match<'a>(
    insert: &'a FlankingOverhangs,
    destination: &'a FlankingOverhangs,
) -> Option<(&'a FlankingOverhang, &'a FlankingOverhang)> {
    insert
        .iter()
        .find_map(|ours| destination.iter().find(|d| ours.is_complementary(d)).map(|d| (ours, d)))
}

/// Both overhangs of each side take part in a match, so the two fragments
/// can close into a ring.
pub fn is_double_match(a: &FlankingOverhangs, b: &FlankingOverhangs) -> bool {
    let mut a_hit = [false; 2];
    let mut b_hit = [false; 2];
    for (ia, x) in a.iter().enumerate() {
        for (ib, y) in b.iter().enumerate() {
            if x.is_complementary(y) {
                a_hit[ia] = true;
                b_hit[ib] = true;
            }
        }
    }
    a_hit.iter().chain(b_hit.iter()).all(|hit| *hit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(bases: &str, overhangs: &[(usize, usize, Direction)]) -> DNAsequence {
        let mut dna = DNAsequence::new("frag", bases);
        for (a, b, dir) in overhangs {
            dna.add_annotation(
                Annotation::new("5' overhang", AnnotationKind::Overhang)
                    .with_interval(Interval::new(*a, *b, *dir)),
            );
        }
        dna
    }

    fn five_prime(bases: &str) -> DNAsequence {
        let n = bases.len();
        fragment(
            bases,
            &[(1, 4, Direction::LeftToRight), (n - 3, n, Direction::RightToLeft)],
        )
    }

    #[test]
    fn test_classify_rules() {
        let n = 20;
        let ltr = |a, b| Interval::new(a, b, Direction::LeftToRight);
        let rtl = |a, b| Interval::new(a, b, Direction::RightToLeft);
        assert_eq!(classify_interval(&ltr(1, 4), n), Some(Terminus::Start));
        assert_eq!(classify_interval(&rtl(17, 20), n), Some(Terminus::End));
        assert_eq!(classify_interval(&ltr(17, 20), n), Some(Terminus::End));
        assert_eq!(classify_interval(&rtl(1, 4), n), Some(Terminus::Start));
        assert_eq!(classify_interval(&ltr(5, 8), n), None);
        assert_eq!(classify_interval(&rtl(17, 19), n), None);
    }

    #[test]
    fn test_last_rule_wins_when_interval_spans_everything() {
        // covers the whole sequence: rule 1 says start, rule 3 says end
        let whole = Interval::new(1, 4, Direction::LeftToRight);
        assert_eq!(classify_interval(&whole, 4), Some(Terminus::End));
    }

    #[test]
    fn test_flanking_overhangs_extracts_bases() {
        let dna = five_prime("acctGGGGGGGGaaca");
        let flanks = flanking_overhangs(&dna).unwrap();
        let start = flanks.at(Terminus::Start).unwrap();
        let end = flanks.at(Terminus::End).unwrap();
        assert_eq!(start.sequence(), "ACCT");
        assert_eq!(end.sequence(), "AACA");
        assert_eq!(end.annotation.intervals.len(), 1);
        // input annotations are left alone
        assert!(dna.annotations()[0].qualifier(QUALIFIER_SEQUENCE).is_none());
    }

    #[test]
    fn test_qualifier_is_overwritten() {
        let mut dna = five_prime("ACCTGGGGGGGGAACA");
        dna.annotations_mut()[0].set_qualifier(QUALIFIER_SEQUENCE, "TTTT");
        let flanks = flanking_overhangs(&dna).unwrap();
        assert_eq!(flanks.at(Terminus::Start).unwrap().sequence(), "ACCT");
    }

    #[test]
    fn test_malformed_fragments() {
        let none = fragment("ACCTGGGGGGGGAACA", &[]);
        assert_eq!(
            flanking_overhangs(&none).unwrap_err().code,
            ErrorCode::MalformedOverhangs
        );
        let one = fragment("ACCTGGGGGGGGAACA", &[(1, 4, Direction::LeftToRight)]);
        assert!(flanking_overhangs(&one).is_err());
        let three = fragment(
            "ACCTGGGGGGGGAACA",
            &[
                (1, 4, Direction::LeftToRight),
                (13, 16, Direction::RightToLeft),
                (1, 4, Direction::RightToLeft),
            ],
        );
        assert!(flanking_overhangs(&three).is_err());
        let interior = fragment(
            "ACCTGGGGGGGGAACA",
            &[(1, 4, Direction::LeftToRight), (6, 9, Direction::RightToLeft)],
        );
        assert!(flanking_overhangs(&interior).is_err());
    }

    #[test]
    fn test_complementarity_needs_opposite_directions() {
        let a = flanking_overhangs(&five_prime("ACCTGGGGGGGGAACA")).unwrap();
        let b = flanking_overhangs(&five_prime("AACAGGGGGGGGTGCC")).unwrap();
        let a_end = a.at(Terminus::End).unwrap();
        let b_start = b.at(Terminus::Start).unwrap();
        assert!(a_end.is_complementary(b_start));
        assert!(!a_end.is_complementary(a_end));
        let (ours, theirs) = overhangs_match(&b, &a).unwrap();
        assert_eq!(ours.terminus, Terminus::Start);
        assert_eq!(theirs.terminus, Terminus::End);
        assert_eq!(ours.sequence(), "AACA");
        assert!(!is_double_match(&a, &b));
    }

    #[test]
    fn test_match_reports_first_pair_in_insert_order() {
        let destination = flanking_overhangs(&five_prime("GCAGTTTTTTTTACCT")).unwrap();
        let insert = flanking_overhangs(&five_prime("ACCTGGGGGGGGGCAG")).unwrap();
        let (ours, theirs) = overhangs_match(&insert, &destination).unwrap();
        assert_eq!(ours.terminus, Terminus::Start);
        assert_eq!(theirs.terminus, Terminus::End);
        assert_eq!(theirs.sequence(), "ACCT");
    }

    #[test]
    fn test_double_match() {
        let vector = flanking_overhangs(&five_prime("GCAGTTTTTTTTACCT")).unwrap();
        let insert = flanking_overhangs(&five_prime("ACCTGGGGGGGGGCAG")).unwrap();
        assert!(is_double_match(&vector, &insert));
        assert!(is_double_match(&insert, &vector));

        let stranger = flanking_overhangs(&five_prime("TTTTGGGGGGGGCCCC")).unwrap();
        assert!(overhangs_match(&vector, &stranger).is_none());
        assert!(!is_double_match(&vector, &stranger));
    }
}
