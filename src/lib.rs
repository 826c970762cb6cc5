// src/lib.rs
//
// Test-support helpers: scripted mock responses, expected-call assertion
// stacks, fixture loading, non-public state inspection, scratch
// directories, HTTP stubbing, and panic capture.

pub mod assertions;
pub mod descriptor;
pub mod fixtures;
pub mod http_mock;
pub mod inspect;
pub mod logging;
pub mod methods;
pub mod panics;
pub mod tmpdir;

pub use assertions::AssertionStack;
pub use descriptor::{MethodDescriptor, MockError, MockTarget, TypeDescriptor};
pub use fixtures::{assert_same_json, Fixtures};
pub use http_mock::{
    build_mock_client, MockBody, MockHttpClient, MockResponse, RecordedRequest, StatusCodes,
};
pub use inspect::{Inspect, InspectError};
pub use logging::init_test_logging;
pub use methods::{MockMethods, StaticMocks};
pub use panics::{catch_panics, quiet_panics};
pub use tmpdir::{tmp_dir, tmp_dir_in};
