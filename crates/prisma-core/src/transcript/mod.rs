//! The transcript and its single writer.
//!
//! [`reducer::TranscriptReducer`] owns the ordered message list and the
//! exchange state. Renderers observe it through [`observer::TranscriptObserver`]
//! and only ever see immutable borrows.

pub mod observer;
pub mod reducer;
