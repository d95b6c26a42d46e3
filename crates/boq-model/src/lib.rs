//! Shared data model for the BOQ audit pipeline.
//!
//! Pure type definitions: raw input rows, canonical positions, enrichment
//! and validation outcomes, and the tri-state classification. No I/O and
//! no algorithmic logic lives here.

pub mod drawing;
pub mod enrichment;
pub mod error;
pub mod position;
pub mod validation;

pub use drawing::{DrawingSpecification, LinkedSpec};
pub use enrichment::{Candidate, EnrichmentResult, MatchGrade};
pub use error::{AuditError, Result};
pub use position::{CanonicalPosition, RawRow, SectionIndex, SectionInfo};
pub use validation::{Classification, ValidationResult, ValidationStatus};
