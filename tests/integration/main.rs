//! Host-side integration tests: the full command → core → actuator chain
//! against mock port implementations, no hardware required.

mod controller_tests;
mod mock_hw;
