//! Short code generation
//!
//! Codes are drawn character by character, uniformly and independently,
//! from a 58-symbol alphabet without visually ambiguous glyphs
//! (no `0`/`O`, no `1`/`l`/`I`).

use std::sync::Arc;

/// 生成短码使用的字母表（Base58）
pub const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Longest code the generator produces and the resolver accepts
pub const MAX_CODE_LENGTH: usize = 32;

/// Source of randomness for code generation.
///
/// `pick(bound)` must return a value in `0..bound`. Production code uses
/// [`ThreadEntropy`]; tests inject scripted sources to force collisions.
pub trait EntropySource: Send + Sync {
    fn pick(&self, bound: usize) -> usize;
}

/// 线程本地 RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadEntropy;

impl EntropySource for ThreadEntropy {
    fn pick(&self, bound: usize) -> usize {
        rand::random_range(0..bound)
    }
}

/// Stateless code generator over an injectable entropy source.
#[derive(Clone)]
pub struct CodeGenerator {
    entropy: Arc<dyn EntropySource>,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(Arc::new(ThreadEntropy))
    }
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator").finish_non_exhaustive()
    }
}

impl CodeGenerator {
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    pub fn generate(&self, length: usize) -> String {
        std::iter::repeat_with(|| {
            // 越界的返回值按取模处理，避免错误的注入源导致 panic
            let idx = self.entropy.pick(BASE58_ALPHABET.len()) % BASE58_ALPHABET.len();
            BASE58_ALPHABET[idx] as char
        })
        .take(length)
        .collect()
    }

    /// Number of distinct codes of `length` symbols.
    pub fn code_space(length: usize) -> u128 {
        (BASE58_ALPHABET.len() as u128).saturating_pow(length as u32)
    }
}

pub fn generate_random_code(length: usize) -> String {
    CodeGenerator::default().generate(length)
}
