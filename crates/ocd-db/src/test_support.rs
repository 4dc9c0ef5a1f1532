//! Shared test utilities for ocd-db unit tests.
