//! Built-in digest primitive: cuts at annotated restriction sites and marks
//! the single-stranded ends of every fragment.

use crate::{
    annotation::{Annotation, AnnotationKind, Direction, Interval, QUALIFIER_SEQUENCE},
    dna_sequence::DNAsequence,
    document::Document,
    error::{CloningError, ErrorCode},
    host::{DigestOptions, DigestPrimitive},
    restriction_enzyme::{RestrictionEnzyme, RestrictionEnzymeSite},
};
use itertools::Itertools;
use tracing::{debug, warn};

pub const FIVE_PRIME_OVERHANG: &str = "5' overhang";
pub const THREE_PRIME_OVERHANG: &str = "3' overhang";

#[derive(Clone, Copy, Debug, Default)]
pub struct RestrictionDigest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CutRegion {
    start: usize,
    width: usize,
}

/// Half-open span of a fragment; `end` may run past the origin of a circular
/// sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FragmentSpan {
    start: usize,
    end: usize,
    left_overhang: bool,
    right_overhang: bool,
}

impl FragmentSpan {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl RestrictionDigest {
    /// The interval holding the first top-strand base of a site. For a site
    /// across the origin that is the part ending on the last base.
    fn site_start(annotation: &Annotation, n: usize) -> Option<&Interval> {
        match annotation.intervals.len() {
            0 | 1 => annotation.interval(),
            _ => annotation
                .intervals
                .iter()
                .find(|i| i.max_index() == n)
                .or_else(|| annotation.interval()),
        }
    }

    fn annotated_sites(enzyme: &RestrictionEnzyme, dna: &DNAsequence) -> Vec<RestrictionEnzymeSite> {
        dna.annotations_of_kind(&AnnotationKind::RestrictionSite)
            .filter(|a| a.name.eq_ignore_ascii_case(&enzyme.name))
            .filter_map(|a| Self::site_start(a, dna.len()))
            .map(|interval| RestrictionEnzymeSite {
                offset: interval.min_index() - 1,
                forward_strand: interval.direction().is_directed_right(),
            })
            .collect()
    }

    fn cut_regions(enzyme: &RestrictionEnzyme, dna: &DNAsequence) -> Vec<CutRegion> {
        let n = dna.len();
        let mut regions = vec![];
        for site in Self::annotated_sites(enzyme, dna) {
            let (start, width) = enzyme.cut_region(&site);
            let start = if dna.is_circular() {
                start.rem_euclid(n as isize) as usize
            } else if start < 0 || start as usize + width > n {
                warn!(
                    "{}: {} cut for site at {} falls outside the sequence",
                    dna.name(),
                    enzyme.name,
                    site.offset + 1
                );
                continue;
            } else {
                start as usize
            };
            regions.push(CutRegion { start, width });
        }
        regions.sort();
        regions.dedup();

        let mut kept: Vec<CutRegion> = Vec::with_capacity(regions.len());
        for region in regions {
            if let Some(last) = kept.last() {
                if region.start < last.start + last.width {
                    warn!(
                        "{}: overlapping {} cuts at {} and {}, keeping the first",
                        dna.name(),
                        enzyme.name,
                        last.start + 1,
                        region.start + 1
                    );
                    continue;
                }
            }
            kept.push(region);
        }
        if dna.is_circular() && kept.len() > 1 {
            let first = kept[0];
            if let Some(last) = kept.last().copied() {
                if last.start + last.width > first.start + n {
                    warn!(
                        "{}: {} cut at {} overlaps the cut at {} across the origin",
                        dna.name(),
                        enzyme.name,
                        last.start + 1,
                        first.start + 1
                    );
                    kept.pop();
                }
            }
        }
        kept
    }

    fn fragment_spans(regions: &[CutRegion], dna: &DNAsequence) -> Vec<FragmentSpan> {
        let n = dna.len();
        let (Some(first), Some(last)) = (regions.first(), regions.last()) else {
            return vec![];
        };
        let inner = regions.iter().tuple_windows().map(|(a, b)| FragmentSpan {
            start: a.start,
            end: b.start + b.width,
            left_overhang: true,
            right_overhang: true,
        });
        if dna.is_circular() {
            inner
                .chain(std::iter::once(FragmentSpan {
                    start: last.start,
                    end: first.start + n + first.width,
                    left_overhang: true,
                    right_overhang: true,
                }))
                .collect()
        } else {
            std::iter::once(FragmentSpan {
                start: 0,
                end: first.start + first.width,
                left_overhang: false,
                right_overhang: true,
            })
            .chain(inner)
            .chain(std::iter::once(FragmentSpan {
                start: last.start,
                end: n,
                left_overhang: true,
                right_overhang: false,
            }))
            .filter(|span| span.len() > first.width)
            .collect()
        }
    }

    fn overhang_annotation(bases: &[u8], at_start: bool, width: usize, five_prime: bool) -> Annotation {
        let len = bases.len();
        let (lo, hi) = match at_start {
            true => (1, width),
            false => (len - width + 1, len),
        };
        let direction = match at_start == five_prime {
            true => Direction::LeftToRight,
            false => Direction::RightToLeft,
        };
        let name = match five_prime {
            true => FIVE_PRIME_OVERHANG,
            false => THREE_PRIME_OVERHANG,
        };
        Annotation::new(name, AnnotationKind::Overhang)
            .with_interval(Interval::new(lo, hi, direction))
            .with_qualifier(QUALIFIER_SEQUENCE, &String::from_utf8_lossy(&bases[lo - 1..hi]))
    }

    fn carry_interval(interval: &Interval, span: &FragmentSpan, dna: &DNAsequence) -> Option<Interval> {
        let lo = interval.min_index().checked_sub(1)?;
        let hi = interval.max_index() - 1;
        let shifts = match dna.is_circular() {
            true => vec![0, dna.len()],
            false => vec![0],
        };
        shifts.iter().find_map(|shift| {
            let (lo, hi) = (lo + shift, hi + shift);
            (lo >= span.start && hi < span.end)
                .then(|| interval.with_span(lo - span.start + 1, hi - span.start + 1))
        })
    }

    fn carried_annotations(span: &FragmentSpan, dna: &DNAsequence) -> Vec<Annotation> {
        dna.annotations()
            .iter()
            .filter_map(|annotation| {
                let intervals = annotation
                    .intervals
                    .iter()
                    .map(|interval| Self::carry_interval(interval, span, dna))
                    .collect::<Option<Vec<_>>>()?;
                let mut carried = annotation.clone();
                carried.intervals = intervals;
                Some(carried)
            })
            .collect()
    }

    fn fragment(
        dna: &DNAsequence,
        enzyme: &RestrictionEnzyme,
        span: &FragmentSpan,
        width: usize,
        number: usize,
    ) -> Result<DNAsequence, CloningError> {
        let bases = dna.get_range_safe(span.start, span.len()).ok_or_else(|| {
            CloningError::new(
                ErrorCode::Internal,
                format!(
                    "Fragment {}..{} lies outside '{}'",
                    span.start + 1,
                    span.end,
                    dna.name()
                ),
            )
        })?;
        let name = format!("{} {} fragment {}", dna.name(), enzyme.name, number);
        let mut fragment = DNAsequence::new(&name, &String::from_utf8_lossy(&bases));
        fragment.set_description(&format!("{} digested with {}", dna.name(), enzyme.name));
        fragment.set_annotations(Self::carried_annotations(span, dna));

        let five_prime = enzyme.overhang > 0;
        if span.left_overhang {
            fragment.add_annotation(Self::overhang_annotation(&bases, true, width, five_prime));
        }
        if span.right_overhang {
            fragment.add_annotation(Self::overhang_annotation(&bases, false, width, five_prime));
        }
        Ok(fragment)
    }
}

impl DigestPrimitive for RestrictionDigest {
    fn digest_options(
        &self,
        enzyme: &RestrictionEnzyme,
        sequence: &DNAsequence,
    ) -> Result<DigestOptions, CloningError> {
        if sequence.is_empty() {
            return Err(CloningError::new(
                ErrorCode::InvalidInput,
                format!("'{}' has no bases to digest", sequence.name()),
            ));
        }
        Ok(DigestOptions {
            enzyme: enzyme.clone(),
        })
    }

    fn digest(
        &self,
        options: &DigestOptions,
        sequence: &DNAsequence,
    ) -> Result<Vec<Document>, CloningError> {
        let enzyme = &options.enzyme;
        let regions = Self::cut_regions(enzyme, sequence);
        let Some(width) = regions.first().map(|r| r.width) else {
            debug!("{}: no {} cuts", sequence.name(), enzyme.name);
            return Ok(vec![Document::Nucleotide(sequence.clone())]);
        };
        let sequences = Self::fragment_spans(&regions, sequence)
            .iter()
            .enumerate()
            .map(|(i, span)| Self::fragment(sequence, enzyme, span, width, i + 1))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "{}: {} cut(s), {} fragment(s)",
            sequence.name(),
            regions.len(),
            sequences.len()
        );
        Ok(vec![Document::SequenceList {
            name: format!("{} {} digest", sequence.name(), enzyme.name),
            sequences,
        }])
    }
}
