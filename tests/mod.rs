mod failing_store;
mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the library:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - service_tests: Weekly schedule and free slots through the in-memory store
// - editor_flow: Editing availability and saving it through the service
// - failing_store: Storage failures surfacing as typed errors
// - redis_store: End-to-end run against a live Redis (ignored by default)
