//! Cross-module tests: whole frames and the timeline properties that hold
//! across time axis, packing, hour marks and weather geometry.

mod property_tests;
