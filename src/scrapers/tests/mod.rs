mod support;

mod profile_tests;
