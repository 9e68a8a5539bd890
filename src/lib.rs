use enzymes::Enzymes;
use lazy_static::lazy_static;

pub mod about;
pub mod annotation;
pub mod assembly;
pub mod cleanup;
pub mod digest;
pub mod dna_sequence;
pub mod document;
pub mod enzymes;
pub mod error;
pub mod executor;
pub mod feature_location;
pub mod fragment_filter;
pub mod host;
pub mod iupac_code;
pub mod ligation;
pub mod logging;
pub mod options;
pub mod overhangs;
pub mod restriction_digest;
pub mod restriction_enzyme;

#[cfg(test)]
pub(crate) mod test_support;

lazy_static! {
    // Type-IIS enzymes usable for assembly
    pub static ref ENZYMES: Enzymes = Enzymes::default();
}
