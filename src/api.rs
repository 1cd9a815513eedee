pub mod client;
pub mod contributor;
pub mod error;
pub mod experiment;
pub mod filter;
pub mod id;
pub mod list;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` leaves alone.
pub(crate) const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// serialize i64 as str
mod str_int {
    use serde::ser::{Serialize, Serializer};

    pub fn serialize<S>(int: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s: String = format!("{}", int);
        s.serialize(serializer)
    }
}
