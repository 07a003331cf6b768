//! CAD collaborator abstraction
//!
//! The gear build never owns sketches or solids. It drives a host CAD system
//! through [`CadCollaborator`], which is injected into the orchestrator.

mod memory;
mod traits;

pub use memory::{CIRCLE_TYPE_CODE, Command, InMemoryCollaborator};
pub use traits::*;
