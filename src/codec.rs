//! Conversions between stored value text and typed values.
//!
//! Decoding never touches the index and never panics: text that does not fit
//! the requested shape decodes to `None`, which the document turns into a
//! [`ConfigError::TypeError`](crate::ConfigError::TypeError). A missing key and
//! a legitimate zero are therefore always distinguishable.
//!
//! | Type   | Accepted text                        | Written as          |
//! |--------|--------------------------------------|---------------------|
//! | String | `"body"` (no escapes)                | `"body"`            |
//! | Int    | leading signed decimal, e.g. `42ms`  | `42`                |
//! | Float  | leading decimal literal              | `1.500000`          |
//! | Bool   | exactly `true` or `false`            | `true` / `false`    |
//! | VecN   | `(` N blank-separated floats `)`     | `(1.000000 2.000000)` |

use crate::scanner::{CharClass, Scanner, classify, is_end_of_line};
use crate::types::{Vec2, Vec3, Vec4};

/// A type that can be stored as value text
pub trait ValueCodec: Sized {
    /// Name used in type errors
    const TYPE_NAME: &'static str;

    /// Decode value text, or `None` when it does not have this type's shape
    fn decode(text: &str) -> Option<Self>;

    /// Encode into value text that [`decode`](ValueCodec::decode) reads back
    fn encode(&self) -> String;

    /// Reject values the file format cannot carry
    fn check(&self) -> Result<(), &'static str> {
        Ok(())
    }
}

/// Body of a quoted string, without the quotes
pub fn decode_str(text: &str) -> Option<&str> {
    let body = text.strip_prefix('"')?;
    let end = body.find('"')?;
    Some(&body[..end])
}

pub fn encode_str(value: &str) -> String {
    format!("\"{}\"", value)
}

/// Leading signed decimal integer
pub fn decode_int(text: &str) -> Option<i64> {
    let mut scanner = Scanner::new(text);
    scanner.skip_blanks();
    scanner.take_int_literal()?.parse().ok()
}

/// Leading decimal floating point literal
pub fn decode_float(text: &str) -> Option<f64> {
    let mut scanner = Scanner::new(text);
    scanner.skip_blanks();
    scanner.take_float_literal()?.parse().ok()
}

pub fn encode_float(value: f64) -> String {
    format!("{:.6}", value)
}

pub fn decode_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// `(` followed by exactly `N` blank-separated floats and `)`
pub fn decode_tuple<const N: usize>(text: &str) -> Option<[f64; N]> {
    let mut scanner = Scanner::new(text);
    if !scanner.eat(b'(') {
        return None;
    }

    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let blanks = scanner.skip_blanks();
        if i > 0 && blanks == 0 {
            return None;
        }
        *slot = scanner.take_float_literal()?.parse().ok()?;
    }

    scanner.skip_blanks();
    if !scanner.eat(b')') {
        return None;
    }
    scanner.skip_blanks();
    scanner.is_at_end().then_some(out)
}

/// Reject encoded text that would read back differently once saved and parsed.
///
/// Applies to every [`ValueCodec`], including ones defined outside this crate.
pub fn check_value_text(text: &str) -> Result<(), &'static str> {
    let bytes = text.as_bytes();
    if bytes.iter().any(|&b| classify(b) == CharClass::EndOfLine) {
        return Err("value text cannot contain line breaks");
    }

    match bytes.first().copied().map(classify) {
        None => Ok(()),
        Some(CharClass::Blank) => Err("value text cannot start with a blank"),
        Some(CharClass::Quote) => match decode_str(text) {
            Some(body) if body.len() + 2 == text.len() => Ok(()),
            _ => Err("quoted value text must end at its closing quote"),
        },
        Some(_) => {
            if bytes.last().is_some_and(|&b| classify(b) == CharClass::Blank) {
                return Err("value text cannot end with a blank");
            }
            // `\#` survives a reparse, a bare `#` starts a comment
            let bare_hash = bytes.iter().enumerate().any(|(i, &b)| {
                classify(b) == CharClass::Comment && (i == 0 || bytes[i - 1] != b'\\')
            });
            if bare_hash {
                Err("value text cannot contain an unescaped '#'")
            } else {
                Ok(())
            }
        }
    }
}

fn check_finite(components: &[f64]) -> Result<(), &'static str> {
    if components.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err("non-finite numbers cannot be written")
    }
}

impl ValueCodec for String {
    const TYPE_NAME: &'static str = "String";

    fn decode(text: &str) -> Option<Self> {
        decode_str(text).map(str::to_string)
    }

    fn encode(&self) -> String {
        encode_str(self)
    }

    fn check(&self) -> Result<(), &'static str> {
        if self.contains('"') {
            Err("strings cannot contain '\"'")
        } else if self.bytes().any(is_end_of_line) {
            Err("strings cannot contain line breaks")
        } else {
            Ok(())
        }
    }
}

impl ValueCodec for i64 {
    const TYPE_NAME: &'static str = "Int";

    fn decode(text: &str) -> Option<Self> {
        decode_int(text)
    }

    fn encode(&self) -> String {
        self.to_string()
    }
}

impl ValueCodec for f64 {
    const TYPE_NAME: &'static str = "Float";

    fn decode(text: &str) -> Option<Self> {
        decode_float(text)
    }

    fn encode(&self) -> String {
        encode_float(*self)
    }

    fn check(&self) -> Result<(), &'static str> {
        check_finite(&[*self])
    }
}

impl ValueCodec for bool {
    const TYPE_NAME: &'static str = "Bool";

    fn decode(text: &str) -> Option<Self> {
        decode_bool(text)
    }

    fn encode(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_tuple_codec {
    ($ty:ty, $n:literal, $name:literal) => {
        impl ValueCodec for $ty {
            const TYPE_NAME: &'static str = $name;

            fn decode(text: &str) -> Option<Self> {
                decode_tuple::<$n>(text).map(<$ty>::from)
            }

            fn encode(&self) -> String {
                self.to_string()
            }

            fn check(&self) -> Result<(), &'static str> {
                check_finite(&self.to_array())
            }
        }
    };
}

impl_tuple_codec!(Vec2, 2, "Vec2");
impl_tuple_codec!(Vec3, 3, "Vec3");
impl_tuple_codec!(Vec4, 4, "Vec4");
