use crate::{dna_sequence::DNAsequence, iupac_code::IupacCode};
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// A type-IIS restriction enzyme as used for GreenGate reactions.
///
/// `cut` is the number of bases, counted from the first base of the
/// recognition site, that stay on the left of the top-strand cut. `overhang`
/// is the length of the single-stranded end; negative values mean 3'
/// overhangs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,
    pub sequence: String,
    pub sequence_rc: String,
    pub pattern: String,
    pub cut: isize,
    pub overhang: isize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestrictionEnzymeSite {
    /// 0-based position of the first base of the site on the top strand.
    pub offset: usize,
    pub forward_strand: bool,
}

impl RestrictionEnzyme {
    pub fn new(name: &str, sequence: &str, pattern: &str, cut: isize, overhang: isize) -> Self {
        let sequence = sequence.to_ascii_uppercase();
        let sequence_rc = String::from_utf8_lossy(&IupacCode::reverse_complement(sequence.as_bytes()))
            .to_string();
        Self {
            name: name.to_string(),
            sequence,
            sequence_rc,
            pattern: pattern.to_string(),
            cut,
            overhang,
            note: None,
        }
    }

    pub fn recognition_len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_palindromic(&self) -> bool {
        self.sequence == self.sequence_rc
    }

    pub fn normalize(&mut self) -> Result<()> {
        self.sequence = self.sequence.to_ascii_uppercase();
        self.sequence_rc = self.sequence_rc.to_ascii_uppercase();
        if self.sequence.is_empty() || !IupacCode::is_nucleotide_sequence(self.sequence.as_bytes())
        {
            return Err(anyhow!(
                "Enzyme '{}' has an invalid recognition site '{}'",
                self.name,
                self.sequence
            ));
        }
        let expected_rc = IupacCode::reverse_complement(self.sequence.as_bytes());
        if self.sequence_rc.as_bytes() != expected_rc.as_slice() {
            return Err(anyhow!(
                "Enzyme '{}': '{}' is not the reverse complement of '{}'",
                self.name,
                self.sequence_rc,
                self.sequence
            ));
        }
        if self.overhang == 0 {
            return Err(anyhow!("Enzyme '{}' cuts blunt; no overhang to assemble on", self.name));
        }
        Ok(())
    }

    /// All sites on both strands: forward hits first, then reverse hits, each
    /// in ascending position. Palindromic sites are only reported once. On a
    /// circular sequence a site may run across the origin.
    pub fn get_sites(&self, seq: &DNAsequence) -> Vec<RestrictionEnzymeSite> {
        let n = seq.len();
        let haystack: Vec<u8> = match seq.is_circular() {
            true => seq
                .forward()
                .iter()
                .chain(seq.forward().iter().take(self.recognition_len().saturating_sub(1)))
                .copied()
                .collect(),
            false => seq.forward().to_vec(),
        };
        let hits = |needle: &str, forward_strand: bool| {
            find_all_subsequences(&haystack, needle.as_bytes())
                .into_iter()
                .filter(|offset| *offset < n)
                .map(move |offset| RestrictionEnzymeSite {
                    offset,
                    forward_strand,
                })
                .collect::<Vec<_>>()
        };
        let mut ret = hits(self.sequence.as_str(), true);
        if !self.is_palindromic() {
            ret.extend(hits(self.sequence_rc.as_str(), false));
        }
        ret
    }

    /// Single-stranded region left by cutting at `site`: 0-based start on the
    /// top strand (may fall outside the sequence) and width.
    pub fn cut_region(&self, site: &RestrictionEnzymeSite) -> (isize, usize) {
        let site_start = site.offset as isize;
        let (first, second) = if site.forward_strand {
            let top = site_start + self.cut;
            (top, top + self.overhang)
        } else {
            let bottom = site_start + self.recognition_len() as isize - self.cut;
            (bottom - self.overhang, bottom)
        };
        (first.min(second), self.overhang.unsigned_abs())
    }
}

/// Next occurrence of `needle` at or after `start`, ignoring case. `None`
/// means not found; `Some(0)` is a hit on the first base.
pub fn find_subsequence(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() || start >= haystack.len() {
        return None;
    }
    let end = haystack.len() - needle.len();
    (start..=end).find(|idx| haystack[*idx..*idx + needle.len()].eq_ignore_ascii_case(needle))
}

pub fn find_all_subsequences(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    let mut ret = vec![];
    let mut start = 0usize;
    while let Some(pos) = find_subsequence(haystack, needle, start) {
        ret.push(pos);
        start = pos + 1;
    }
    ret
}
