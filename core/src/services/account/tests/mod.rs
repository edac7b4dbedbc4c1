//! Tests for the account flows

#[cfg(test)]
mod registration_tests;
#[cfg(test)]
mod password_reset_tests;
#[cfg(test)]
mod support;
