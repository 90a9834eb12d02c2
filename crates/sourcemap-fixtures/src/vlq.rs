//! Standalone VLQ encoder so fixtures do not depend on the decoder under test.

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

pub fn encode(out: &mut String, value: i64) {
    let mut rest = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (rest & 0b1_1111) as usize;
        rest >>= 5;
        if rest != 0 {
            digit |= 0b10_0000;
        }
        out.push(ALPHABET[digit] as char);
        if rest == 0 {
            return;
        }
    }
}
