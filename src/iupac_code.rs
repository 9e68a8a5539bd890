pub struct IupacCode;

impl IupacCode {
    #[inline(always)]
    pub fn is_valid_letter(letter: u8) -> bool {
        matches!(
            letter.to_ascii_uppercase(),
            b'A' | b'C'
                | b'G'
                | b'T'
                | b'U'
                | b'W'
                | b'S'
                | b'M'
                | b'K'
                | b'R'
                | b'Y'
                | b'B'
                | b'D'
                | b'H'
                | b'V'
                | b'N'
        )
    }

    /// Complement of a single base. IUPAC ambiguity codes map onto their
    /// complementary code, anything else becomes `N`.
    #[inline(always)]
    pub fn letter_complement(letter: u8) -> u8 {
        match letter.to_ascii_uppercase() {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' => b'A',
            b'U' => b'A',
            b'W' => b'W',
            b'S' => b'S',
            b'M' => b'K',
            b'K' => b'M',
            b'R' => b'Y',
            b'Y' => b'R',
            b'B' => b'V',
            b'V' => b'B',
            b'D' => b'H',
            b'H' => b'D',
            _ => b'N',
        }
    }

    pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
        seq.iter()
            .rev()
            .map(|c| Self::letter_complement(*c))
            .collect()
    }

    pub fn is_nucleotide_sequence(seq: &[u8]) -> bool {
        seq.iter()
            .filter(|c| !c.is_ascii_whitespace())
            .all(|c| Self::is_valid_letter(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement() {
        assert_eq!(IupacCode::letter_complement(b'A'), b'T');
        assert_eq!(IupacCode::letter_complement(b'C'), b'G');
        assert_eq!(IupacCode::letter_complement(b'G'), b'C');
        assert_eq!(IupacCode::letter_complement(b'T'), b'A');
        assert_eq!(IupacCode::letter_complement(b'U'), b'A');
        assert_eq!(IupacCode::letter_complement(b'R'), b'Y');
        assert_eq!(IupacCode::letter_complement(b'X'), b'N');
        assert_eq!(IupacCode::letter_complement(b'a'), b'T');
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(IupacCode::reverse_complement(b"GGTCTC"), b"GAGACC".to_vec());
        assert_eq!(IupacCode::reverse_complement(b"gaagac"), b"GTCTTC".to_vec());
        assert!(IupacCode::reverse_complement(b"").is_empty());
    }

    #[test]
    fn test_nucleotide_classification() {
        assert!(IupacCode::is_nucleotide_sequence(b"ACGTN acgt\nRY"));
        assert!(!IupacCode::is_nucleotide_sequence(b"MKLVEF"));
        assert!(IupacCode::is_nucleotide_sequence(b""));
    }
}
