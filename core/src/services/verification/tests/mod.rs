//! Tests for the verification code manager
