use crate::{
    error::{CloningError, ErrorCode},
    restriction_enzyme::RestrictionEnzyme,
};
use anyhow::{Result, anyhow};
use std::fs;

const RUNTIME_ENZYMES_PATH: &str = "data/resources/greengate.enzymes.json";
const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// Read-only catalogue of the enzymes a GreenGate reaction can use.
#[derive(Clone, Debug)]
pub struct Enzymes {
    restriction_enzymes: Vec<RestrictionEnzyme>,
}

impl Enzymes {
    pub fn new(json_text: &str) -> Result<Self> {
        let res: serde_json::Value = serde_json::from_str(json_text)?;
        let arr = res
            .as_array()
            .ok_or(anyhow!("Enzymes file is not a JSON array"))?;
        let mut restriction_enzymes = Vec::with_capacity(arr.len());
        for row in arr {
            let mut re: RestrictionEnzyme = serde_json::from_value(row.clone())
                .map_err(|e| anyhow!("Bad restriction enzyme: {row}: {e}"))?;
            re.normalize()?;
            restriction_enzymes.push(re);
        }
        Ok(Self {
            restriction_enzymes,
        })
    }

    pub fn restriction_enzymes(&self) -> &[RestrictionEnzyme] {
        &self.restriction_enzymes
    }

    pub fn get(&self, name: &str) -> Option<&RestrictionEnzyme> {
        self.restriction_enzymes
            .iter()
            .find(|re| re.name.eq_ignore_ascii_case(name))
    }

    pub fn by_name(&self, name: &str) -> Result<RestrictionEnzyme, CloningError> {
        self.get(name).cloned().ok_or_else(|| {
            CloningError::new(
                ErrorCode::NotFound,
                format!("Unknown enzyme '{name}'"),
            )
        })
    }
}

pub fn load_restriction_enzymes_from_path(path: &str) -> Result<Vec<RestrictionEnzyme>> {
    let text = fs::read_to_string(path)?;
    Ok(Enzymes::new(&text)?.restriction_enzymes)
}

impl Default for Enzymes {
    fn default() -> Self {
        let mut base = match Enzymes::new(BUILTIN_ENZYMES_JSON) {
            Ok(base) => base,
            Err(e) => panic!("Built-in enzyme catalogue is invalid: {e}"),
        };
        if let Ok(custom) = load_restriction_enzymes_from_path(RUNTIME_ENZYMES_PATH) {
            if !custom.is_empty() {
                base.restriction_enzymes = custom;
            }
        }
        base
    }
}
