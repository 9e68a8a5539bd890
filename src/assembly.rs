//! Greedy GreenGate assembly. Every input is digested, the usable fragments
//! are pooled, and inserts are ligated onto the first fragment until it
//! closes into a ring or nothing else fits.

use crate::{
    cleanup::cleanup_annotations,
    digest::cut_sequence,
    dna_sequence::DNAsequence,
    document::Document,
    error::{CloningError, ErrorCode},
    executor::{InlineExecutor, OwningThread, run_and_wait},
    fragment_filter::select_needed_sequences,
    host::{DigestPrimitive, LigationPrimitive},
    ligation::StickyEndLigation,
    overhangs::{flanking_overhangs, is_double_match, overhangs_match},
    restriction_digest::RestrictionDigest,
    restriction_enzyme::RestrictionEnzyme,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssemblyOutcome {
    Circularized,
    /// No insert fits any more but the product is still linear.
    ExhaustedLinear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AssemblyPhase {
    Assembling,
    Stuck,
    Circularized,
    ExhaustedLinear,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LigationStep {
    pub destination: String,
    pub insert: String,
    pub circular: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CloningReport {
    pub enzyme: String,
    pub fragment_count: usize,
    pub ligations: Vec<LigationStep>,
    pub outcome: AssemblyOutcome,
    pub products: Vec<DNAsequence>,
    pub warnings: Vec<String>,
    pub messages: Vec<String>,
}

impl CloningReport {
    pub fn product(&self) -> Option<&DNAsequence> {
        self.products.first()
    }

    pub fn is_circularized(&self) -> bool {
        self.outcome == AssemblyOutcome::Circularized
    }
}

#[derive(Debug, Default)]
struct Diagnostics {
    warnings: Vec<String>,
    messages: Vec<String>,
}

impl Diagnostics {
    fn warn(&mut self, message: String) {
        if !self.warnings.contains(&message) {
            warn!("{message}");
            self.warnings.push(message);
        }
    }

    fn note(&mut self, message: String) {
        debug!("{message}");
        self.messages.push(message);
    }
}

struct AssemblyState {
    destination: DNAsequence,
    pool: Vec<DNAsequence>,
    ligations: Vec<LigationStep>,
}

impl AssemblyState {
    fn new(mut fragments: Vec<DNAsequence>) -> Result<Self, CloningError> {
        if fragments.is_empty() {
            return Err(CloningError::new(
                ErrorCode::InvalidInput,
                "No usable fragments after digestion",
            ));
        }
        let destination = fragments.remove(0);
        Ok(Self {
            destination,
            pool: fragments,
            ligations: vec![],
        })
    }
}

#[derive(Clone)]
pub struct SequenceAssembler {
    digester: Arc<dyn DigestPrimitive>,
    ligator: Arc<dyn LigationPrimitive>,
    owner: Arc<dyn OwningThread>,
}

impl Default for SequenceAssembler {
    fn default() -> Self {
        Self::new(
            Arc::new(RestrictionDigest),
            Arc::new(StickyEndLigation),
            Arc::new(InlineExecutor),
        )
    }
}

impl SequenceAssembler {
    pub fn new(
        digester: Arc<dyn DigestPrimitive>,
        ligator: Arc<dyn LigationPrimitive>,
        owner: Arc<dyn OwningThread>,
    ) -> Self {
        Self {
            digester,
            ligator,
            owner,
        }
    }

    pub fn with_owning_thread(mut self, owner: Arc<dyn OwningThread>) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_digest(mut self, digester: Arc<dyn DigestPrimitive>) -> Self {
        self.digester = digester;
        self
    }

    pub fn with_ligation(mut self, ligator: Arc<dyn LigationPrimitive>) -> Self {
        self.ligator = ligator;
        self
    }

    /// Digests and assembles `documents`. A product that stays linear is
    /// still returned, with outcome `ExhaustedLinear` and a warning.
    pub fn perform_cloning(
        &self,
        enzyme: &RestrictionEnzyme,
        documents: &[Document],
    ) -> Result<CloningReport, CloningError> {
        let mut diagnostics = Diagnostics::default();
        let fragments = self.prepare_fragments(enzyme, documents, &mut diagnostics)?;
        let fragment_count = fragments.len();
        let mut state = AssemblyState::new(fragments)?;

        let mut phase = AssemblyPhase::Assembling;
        loop {
            phase = match phase {
                AssemblyPhase::Assembling => self.step(&mut state, &mut diagnostics)?,
                AssemblyPhase::Stuck => {
                    diagnostics.warn(format!(
                        "Assembly incomplete: '{}' is still linear, {} fragment(s) left unplaced",
                        state.destination.name(),
                        state.pool.len()
                    ));
                    AssemblyPhase::ExhaustedLinear
                }
                AssemblyPhase::Circularized | AssemblyPhase::ExhaustedLinear => break,
            };
        }
        let outcome = match phase {
            AssemblyPhase::Circularized => AssemblyOutcome::Circularized,
            _ => AssemblyOutcome::ExhaustedLinear,
        };

        let product = cleanup_annotations(Document::Nucleotide(state.destination))?;
        info!(
            "{}: {} bp, {:?} after {} ligation(s)",
            product.name(),
            product.len(),
            outcome,
            state.ligations.len()
        );
        Ok(CloningReport {
            enzyme: enzyme.name.clone(),
            fragment_count,
            ligations: state.ligations,
            outcome,
            products: vec![product],
            warnings: diagnostics.warnings,
            messages: diagnostics.messages,
        })
    }

    fn prepare_fragments(
        &self,
        enzyme: &RestrictionEnzyme,
        documents: &[Document],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<DNAsequence>, CloningError> {
        let mut digested = vec![];
        for document in documents {
            for dna in document.clone().flatten()? {
                let parts = cut_sequence(enzyme, &Document::from(dna), &self.digester, self.owner.as_ref())?;
                info!("Digested '{}' with {}", document.name(), enzyme.name);
                digested.extend(parts);
            }
        }
        let fragments = select_needed_sequences(enzyme, digested)?;
        diagnostics.note(format!(
            "{} usable fragment(s) from {} document(s)",
            fragments.len(),
            documents.len()
        ));
        Ok(fragments)
    }

    fn step(
        &self,
        state: &mut AssemblyState,
        diagnostics: &mut Diagnostics,
    ) -> Result<AssemblyPhase, CloningError> {
        if state.destination.is_circular() {
            return Ok(AssemblyPhase::Circularized);
        }
        let Some(index) = self.find_matching_insert(state, diagnostics) else {
            return Ok(AssemblyPhase::Stuck);
        };
        let insert = state.pool.remove(index);
        let product = self.ligate(&state.destination, &insert)?;
        let step = LigationStep {
            destination: state.destination.name().to_string(),
            insert: insert.name().to_string(),
            circular: product.is_circular(),
        };
        info!(
            "Ligated '{}' to '{}'{}",
            step.insert,
            step.destination,
            if step.circular { ", circularized" } else { "" }
        );
        diagnostics.note(format!("Ligated '{}' to '{}'", step.insert, step.destination));
        state.ligations.push(step);
        state.destination = product;
        Ok(AssemblyPhase::Assembling)
    }

    /// First insert in pool order with an overhang complementary to one of
    /// the destination's. Fragments with malformed overhangs are skipped.
    fn find_matching_insert(
        &self,
        state: &AssemblyState,
        diagnostics: &mut Diagnostics,
    ) -> Option<usize> {
        let destination = match flanking_overhangs(&state.destination) {
            Ok(flanks) => flanks,
            Err(e) => {
                diagnostics.warn(e.message);
                return None;
            }
        };
        for (index, insert) in state.pool.iter().enumerate() {
            let flanks = match flanking_overhangs(insert) {
                Ok(flanks) => flanks,
                Err(e) => {
                    diagnostics.warn(e.message);
                    continue;
                }
            };
            if let Some((_, theirs)) = overhangs_match(&flanks, &destination) {
                debug!(
                    "'{}' fits '{}' on {}",
                    insert.name(),
                    state.destination.name(),
                    theirs.sequence()
                );
                return Some(index);
            }
        }
        None
    }

    fn ligate(
        &self,
        destination: &DNAsequence,
        insert: &DNAsequence,
    ) -> Result<DNAsequence, CloningError> {
        let circular = is_double_match(&flanking_overhangs(destination)?, &flanking_overhangs(insert)?);
        let options = {
            let ligator = Arc::clone(&self.ligator);
            let (d, i) = (destination.clone(), insert.clone());
            run_and_wait(self.owner.as_ref(), move || {
                ligator.ligation_options([&d, &i]).map(|mut options| {
                    options.circular = circular;
                    options
                })
            })??
        };
        let mut products = self.ligator.ligate(&options, [destination, insert])?;
        match products.len() {
            0 => Err(CloningError::new(
                ErrorCode::LigationFailed,
                format!(
                    "Ligation of '{}' and '{}' gave no product",
                    destination.name(),
                    insert.name()
                ),
            )),
            1 => products.pop().ok_or_else(|| {
                CloningError::new(ErrorCode::Internal, "Ligation product vanished")
            }),
            n => Err(CloningError::new(
                ErrorCode::ResultAmbiguous,
                format!(
                    "Ligation of '{}' and '{}' gave {n} products",
                    destination.name(),
                    insert.name()
                ),
            )),
        }
    }
}
