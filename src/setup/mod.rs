//! Setup module for the Voxel Forge application.
//!
//! Model loading and the threaded execution of a generation request.

/// Model loading and the solver thread.
pub mod execution;
