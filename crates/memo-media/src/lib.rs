//! CPU-bound image work: collage compositing and face cropping.
//!
//! Everything here is synchronous; callers on the async path wrap these in
//! `spawn_blocking`.

pub mod collage;
pub mod error;
pub mod faces;

pub use collage::{render_collage, render_collage_base64, COLLAGE_WIDTH};
pub use error::{MediaError, MediaResult};
pub use faces::{crop_faces, FaceBox};
