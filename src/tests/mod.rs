//! Scenario suites exercising the public engine surface


mod concurrent_tests;
