//! This crate has no library code — it exists solely to host the
//! cross-crate integration tests under `tests/`.
