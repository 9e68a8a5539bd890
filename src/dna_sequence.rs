use crate::{
    annotation::{Annotation, AnnotationKind},
    feature_location::{intervals_to_location, location_intervals},
    iupac_code::IupacCode,
};
use anyhow::Result;
use bio::io::fasta;
use gb_io::seq::{Feature, Qualifier, Seq, Topology};
use serde::{Deserialize, Serialize};
use std::fs::File;

const QUALIFIER_LABEL: &str = "label";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DNAsequence {
    name: String,
    seq: Vec<u8>,
    circular: bool,
    annotations: Vec<Annotation>,
    description: String,
}

impl DNAsequence {
    pub fn new(name: &str, sequence: &str) -> Self {
        let mut ret = Self::from_u8(sequence.as_bytes());
        ret.name = name.to_string();
        ret
    }

    pub fn write_genbank_file(&self, filename: &str) -> Result<()> {
        let file = File::create(filename)?;
        gb_io::writer::write(file, &self.to_genbank_seq())?;
        Ok(())
    }

    pub fn from_fasta_record(record: &fasta::Record) -> Self {
        let mut ret = Self::from_u8(record.seq());
        ret.name = record.id().to_string();
        if let Some(desc) = record.desc() {
            ret.description = desc.to_string();
        }
        ret
    }

    pub fn from_genbank_seq(seq: Seq) -> Self {
        let mut ret = Self::from_u8(&seq.seq);
        ret.name = seq
            .name
            .clone()
            .or_else(|| seq.accession.clone())
            .unwrap_or_default();
        ret.description = seq.definition.clone().unwrap_or_default();
        ret.circular = seq.topology == Topology::Circular;
        ret.annotations = seq.features.iter().map(Self::annotation_from_feature).collect();
        ret
    }

    pub fn to_genbank_seq(&self) -> Seq {
        Seq {
            name: Some(self.name.clone()),
            topology: match self.circular {
                true => Topology::Circular,
                false => Topology::Linear,
            },
            date: None,
            len: Some(self.len()),
            molecule_type: Some("DNA".to_string()),
            division: String::new(),
            definition: (!self.description.is_empty()).then(|| self.description.clone()),
            accession: None,
            version: None,
            source: None,
            dblink: None,
            keywords: None,
            references: vec![],
            comments: vec![],
            seq: self.seq.clone(),
            contig: None,
            features: self
                .annotations
                .iter()
                .filter_map(Self::feature_from_annotation)
                .collect(),
        }
    }

    fn annotation_from_feature(feature: &Feature) -> Annotation {
        let key = feature.kind.to_string();
        let mut name = None;
        let mut ret = Annotation::new("", AnnotationKind::from_feature_key(&key));
        for (qualifier, value) in &feature.qualifiers {
            let qualifier = qualifier.to_string();
            let value = value.clone().unwrap_or_default();
            if qualifier == QUALIFIER_LABEL && name.is_none() {
                name = Some(value);
            } else {
                ret.set_qualifier(&qualifier, &value);
            }
        }
        ret.name = name.unwrap_or(key);
        ret.intervals = location_intervals(&feature.location);
        ret
    }

    fn feature_from_annotation(annotation: &Annotation) -> Option<Feature> {
        let location = intervals_to_location(&annotation.intervals)?;
        let mut qualifiers: Vec<Qualifier> =
            vec![(QUALIFIER_LABEL.into(), Some(annotation.name.clone()))];
        qualifiers.extend(
            annotation
                .qualifiers
                .iter()
                .map(|(k, v)| (k.clone().into(), Some(v.clone()))),
        );
        Some(Feature {
            kind: annotation.kind.feature_key().to_string().into(),
            location,
            qualifiers,
        })
    }

    fn from_u8(s: &[u8]) -> Self {
        Self {
            name: String::new(),
            seq: Self::validate_dna_sequence(s),
            circular: false,
            annotations: vec![],
            description: String::new(),
        }
    }

    /// Bases from `start` (0-based) for `len` positions; wraps the origin on
    /// circular sequences.
    pub fn get_range_safe(&self, start: usize, len: usize) -> Option<Vec<u8>> {
        if self.is_empty() {
            return None;
        }
        if self.is_circular() {
            let n = self.len();
            Some((start..start + len).map(|i| self.seq[i % n]).collect())
        } else {
            self.seq.get(start..start + len).map(|s| s.to_vec())
        }
    }

    #[inline(always)]
    pub fn forward(&self) -> &[u8] {
        &self.seq
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }

    pub fn set_annotations(&mut self, annotations: Vec<Annotation>) {
        self.annotations = annotations;
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn annotations_of_kind<'a>(
        &'a self,
        kind: &'a AnnotationKind,
    ) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations.iter().filter(move |a| a.is_kind(kind))
    }

    pub fn remove_annotations_of_kind(&mut self, kind: &AnnotationKind) -> usize {
        let before = self.annotations.len();
        self.annotations.retain(|a| !a.is_kind(kind));
        before - self.annotations.len()
    }

    pub fn get_forward_string(&self) -> String {
        String::from_utf8_lossy(&self.seq).to_string()
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    pub fn set_circular(&mut self, is_circular: bool) {
        self.circular = is_circular;
    }

    /// Uppercases and drops whitespace; non-IUPAC letters become `N`.
    pub fn validate_dna_sequence(v: &[u8]) -> Vec<u8> {
        v.iter()
            .filter(|c| !c.is_ascii_whitespace())
            .map(|c| {
                if IupacCode::is_valid_letter(*c) {
                    c.to_ascii_uppercase()
                } else {
                    b'N'
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Direction, Interval};

    #[test]
    fn test_bases_are_uppercased() {
        let dna = DNAsequence::new("p1", "acg t\nggtctc");
        assert_eq!(dna.get_forward_string(), "ACGTGGTCTC");
        assert_eq!(dna.name(), "p1");
        assert!(!dna.is_circular());
    }

    #[test]
    fn test_get_range_safe() {
        let mut dna = DNAsequence::new("", "ATGC");

        // linear
        dna.set_circular(false);
        assert_eq!(dna.get_range_safe(0, 4), Some(b"ATGC".to_vec()));
        assert_eq!(dna.get_range_safe(1, 4), None);

        // circular
        dna.set_circular(true);
        assert_eq!(dna.get_range_safe(1, 4), Some(b"TGCA".to_vec())); // Wraps around 0 point
        assert_eq!(dna.get_range_safe(3, 6), Some(b"CATGCA".to_vec()));
    }

    #[test]
    fn test_remove_annotations_of_kind() {
        let mut dna = DNAsequence::new("p1", "GGTCTCAAAA");
        dna.add_annotation(
            Annotation::new("Eco31I", AnnotationKind::RestrictionSite)
                .with_interval(Interval::new(1, 6, Direction::LeftToRight)),
        );
        dna.add_annotation(
            Annotation::new("gene", AnnotationKind::Other("gene".to_string()))
                .with_interval(Interval::new(7, 10, Direction::LeftToRight)),
        );
        assert_eq!(dna.remove_annotations_of_kind(&AnnotationKind::RestrictionSite), 1);
        assert_eq!(dna.annotations().len(), 1);
        assert_eq!(dna.annotations()[0].name, "gene");
    }

    #[test]
    fn test_genbank_round_trip() {
        let mut dna = DNAsequence::new("pGGA", "ACCTGGATCCAACA");
        dna.set_circular(true);
        dna.add_annotation(
            Annotation::new("promoter part", AnnotationKind::Other("promoter".to_string()))
                .with_interval(Interval::new(5, 10, Direction::RightToLeft))
                .with_qualifier("note", "test"),
        );
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        dna.write_genbank_file(&path).unwrap();

        let mut records = gb_io::reader::parse_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        let loaded = DNAsequence::from_genbank_seq(records.remove(0));
        assert_eq!(loaded.get_forward_string(), "ACCTGGATCCAACA");
        assert!(loaded.is_circular());
        assert_eq!(loaded.annotations().len(), 1);
        let anno = &loaded.annotations()[0];
        assert_eq!(anno.name, "promoter part");
        assert_eq!(anno.qualifier("note"), Some("test"));
        assert_eq!(
            anno.intervals,
            vec![Interval::new(5, 10, Direction::RightToLeft)]
        );
    }
}
