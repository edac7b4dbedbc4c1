//! Code generation backed by the OS random number generator

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::{format_code, CODE_SPACE};

use super::traits::CodeGenerator;

/// Draws codes uniformly from `000000..=999999` using the OS CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngCodeGenerator;

impl CodeGenerator for OsRngCodeGenerator {
    fn generate(&self) -> String {
        format_code(OsRng.gen_range(0..CODE_SPACE))
    }
}
