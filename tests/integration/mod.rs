//! Integration tests for the amplirun workflow launcher

mod environment_checks;
