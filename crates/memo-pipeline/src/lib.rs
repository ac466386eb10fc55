//! The MemoMosaic script pipeline.
//!
//! Takes a flat list of heterogeneous media assets and produces an ordered
//! scene sequence: group by location and time, composite collages, describe
//! assets, generate a narrative, and enrich each scene with a background
//! image and narration audio.
//!
//! The load-bearing invariant is ordering consistency: the collage groups,
//! the simplified payload handed to the narrative model, and the three
//! asynchronous enrichment streams must all refer to the same scene at the
//! same index. Every group carries an `ordinal` and every zip point validates
//! lengths before combining.

pub mod assemble;
pub mod collage;
pub mod error;
pub mod grouper;
pub mod providers;
pub mod script;
pub mod simplify;

pub use assemble::assemble_scenes;
pub use collage::{build_collage_groups, COLLAGE_BATCH_SIZE};
pub use error::{PipelineError, PipelineResult};
pub use grouper::{group_by_location, LocationGroup};
pub use providers::{AnnotationsRenderer, GenerativeModel, ImageSearch, SpeechSynthesizer};
pub use script::{ScriptPipeline, DEFAULT_MAX_CONCURRENCY};
pub use simplify::simplify;
