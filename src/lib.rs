//! Workspace-level end-to-end tests for bulkfs live in `tests/`.
