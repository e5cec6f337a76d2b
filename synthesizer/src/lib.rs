//! Weft Synthesizer
//!
//! Turns a query analysis into named, parameter-slotted insertion templates:
//! one creation template for the mandatory properties of an entity and one
//! initializer per writable property.

mod error;
mod synthesizer;
mod template;

pub use error::{SynthError, SynthResult};
pub use synthesizer::{QuerySynthesizer, CREATE_TEMPLATE};
pub use template::{
    TemplateBindings, TemplateOp, TemplateTerm, TemplateTriple, UpdateTemplate, VALUE_PARAM,
};
