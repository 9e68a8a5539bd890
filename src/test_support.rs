use crate::{dna_sequence::DNAsequence, document::Document, restriction_enzyme::RestrictionEnzyme};

pub const BACKBONE_LEFT: &str = "TTTTAAAACCCCTTTTAAAA";
pub const BACKBONE_RIGHT: &str = "CCCCAAAATTTTCCCCAAAA";
pub const STUFFER: &str = "GGGGAAAATTTTCCCCAAAATTTT";

pub fn eco31i() -> RestrictionEnzyme {
    RestrictionEnzyme::new("Eco31I", "GGTCTC", "GGTCTC(1/5)", 7, 4)
}

/// Circular entry plasmid; its Eco31I digest releases `left + body + right`
/// and a backbone that keeps both sites.
pub fn entry_module(name: &str, left: &str, body: &str, right: &str) -> DNAsequence {
    let mut dna = DNAsequence::new(
        name,
        &format!("{BACKBONE_LEFT}GGTCTCA{left}{body}{right}TGAGACC{BACKBONE_RIGHT}"),
    );
    dna.set_circular(true);
    dna
}

/// Circular destination vector; its Eco31I digest yields `start + body + end`
/// and a stuffer fragment that keeps both sites.
pub fn destination_vector(name: &str, start: &str, body: &str, end: &str) -> DNAsequence {
    let mut dna = DNAsequence::new(
        name,
        &format!("{body}{end}TGAGACC{STUFFER}GGTCTCA{start}"),
    );
    dna.set_circular(true);
    dna
}

pub fn rotated(dna: &DNAsequence, by: usize) -> DNAsequence {
    let bases = dna.get_forward_string();
    let mut ret = DNAsequence::new(dna.name(), &format!("{}{}", &bases[by..], &bases[..by]));
    ret.set_circular(dna.is_circular());
    ret
}

pub fn documents(sequences: Vec<DNAsequence>) -> Vec<Document> {
    sequences.into_iter().map(Document::from).collect()
}
