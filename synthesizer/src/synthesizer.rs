//! Update template generation from a query analysis.

use crate::template::{TemplateOp, TemplateTerm, TemplateTriple, UpdateTemplate, VALUE_PARAM};
use crate::{SynthError, SynthResult};
use tracing::debug;
use weft_analyzer::{analyze, QueryAnalysis, VariableProperties};
use weft_parser::SelectQuery;
use weft_registry::Vocabulary;

/// Name of the creation template.
pub const CREATE_TEMPLATE: &str = "create";

/// Generates write templates for the entities described by one analysis.
#[derive(Debug, Clone)]
pub struct QuerySynthesizer {
    analysis: QueryAnalysis,
}

impl QuerySynthesizer {
    /// Wrap an analysis. Ambiguous optional bindings are rejected here so
    /// nothing is generated for them.
    pub fn new(analysis: QueryAnalysis) -> SynthResult<Self> {
        analysis.ensure_unambiguous()?;
        Ok(Self { analysis })
    }

    /// Analyze `query` for `anchor` and wrap the result.
    pub fn from_query(
        query: &SelectQuery,
        anchor: &str,
        vocabulary: &Vocabulary,
    ) -> SynthResult<Self> {
        Self::new(analyze(query, anchor, vocabulary)?)
    }

    pub fn analysis(&self) -> &QueryAnalysis {
        &self.analysis
    }

    pub fn into_analysis(self) -> QueryAnalysis {
        self.analysis
    }

    fn descriptor(&self, variable: &str) -> SynthResult<&VariableProperties> {
        self.analysis
            .get(variable)
            .ok_or_else(|| SynthError::unknown_variable(variable))
    }

    /// One insertion holding `(anchor, p, ?v)` for every mandatory variable
    /// with a direct predicate. Each slot is named after its variable.
    /// Mandatory variables without one are derived values and are skipped.
    pub fn base_creation_update(&self) -> UpdateTemplate {
        let mut triples = Vec::new();
        for (name, props) in &self.analysis.variables {
            if !props.is_mandatory() {
                continue;
            }
            match &props.predicate {
                Some(predicate) => triples.push(TemplateTriple {
                    predicate: predicate.clone(),
                    object: TemplateTerm::Param(name.clone()),
                }),
                None => debug!(variable = %name, "mandatory variable has no anchor predicate"),
            }
        }
        UpdateTemplate::new(CREATE_TEMPLATE, vec![TemplateOp::InsertData(triples)])
    }

    /// One insertion `(anchor, p, ?value)` for `variable`.
    pub fn initializer_update(&self, variable: &str) -> SynthResult<UpdateTemplate> {
        let props = self.descriptor(variable)?;
        let predicate = props
            .predicate
            .clone()
            .ok_or_else(|| SynthError::unanchored_variable(variable))?;
        Ok(UpdateTemplate::new(
            format!("init_{}", variable),
            vec![TemplateOp::InsertData(vec![TemplateTriple {
                predicate,
                object: TemplateTerm::Param(VALUE_PARAM.to_string()),
            }])],
        ))
    }

    /// Initializers for every nullable or multi-valued variable that can be
    /// written.
    pub fn initializer_updates(&self) -> Vec<UpdateTemplate> {
        self.analysis
            .variables
            .iter()
            .filter(|(_, props)| !props.is_mandatory() && props.predicate.is_some())
            .filter_map(|(name, _)| self.initializer_update(name).ok())
            .collect()
    }
}
