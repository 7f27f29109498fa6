use crate::core::error::CodecError;

/// Shift every character of `plaintext` forward by `key` code points.
///
/// The arithmetic is not reduced modulo anything. A shifted value that is not
/// a Unicode scalar value is reported instead of being wrapped.
pub fn encode(plaintext: &str, key: i32) -> Result<String, CodecError> {
    shift(plaintext, i64::from(key))
}

/// Shift every character of `obfuscated` back by `key` code points.
pub fn decode(obfuscated: &str, key: i32) -> Result<String, CodecError> {
    shift(obfuscated, -i64::from(key))
}

fn shift(input: &str, delta: i64) -> Result<String, CodecError> {
    let mut out = String::with_capacity(input.len());

    for (position, ch) in input.chars().enumerate() {
        let shifted = u32::try_from(i64::from(u32::from(ch)) + delta)
            .ok()
            .and_then(char::from_u32)
            .ok_or(CodecError::OutOfRange {
                ch,
                position,
                delta,
            })?;
        out.push(shifted);
    }

    Ok(out)
}
