pub mod code_generator;
pub mod url_validator;

pub use code_generator::{
    BASE58_ALPHABET, CodeGenerator, EntropySource, MAX_CODE_LENGTH, ThreadEntropy,
    generate_random_code,
};
pub use url_validator::{
    HostAllowList, HttpUrlPolicy, UrlPolicy, UrlValidationError, canonicalize_url,
};

/// 判断短码是否只由生成器字母表中的字符组成
///
/// Resolution uses this to reject obviously foreign input before touching
/// the store.
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code.bytes().all(|b| BASE58_ALPHABET.contains(&b))
}
