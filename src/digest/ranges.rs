//! Compression of episode numbers into range tokens.
//!
//! `[0, 1, 2, 4, 5, 7]` becomes `["0-2", "4-5", "7"]`.

use jellydigest_common::{Error, Result};

/// A value that may be coerced into an episode number.
pub trait RangeValue {
    /// The integer this value stands for, or `None` when it has none.
    fn to_index(&self) -> Option<i64>;
}

macro_rules! int_range_value {
    ($($t:ty),*) => {
        $(impl RangeValue for $t {
            fn to_index(&self) -> Option<i64> {
                i64::try_from(*self).ok()
            }
        })*
    };
}

int_range_value!(i32, i64, u16, u32, u64, usize);

impl RangeValue for &str {
    fn to_index(&self) -> Option<i64> {
        self.trim().parse().ok()
    }
}

impl RangeValue for String {
    fn to_index(&self) -> Option<i64> {
        self.as_str().to_index()
    }
}

impl<T: RangeValue> RangeValue for Option<T> {
    fn to_index(&self) -> Option<i64> {
        self.as_ref().and_then(RangeValue::to_index)
    }
}

/// Summarize episode numbers into sorted, maximal range tokens.
///
/// Duplicates collapse into the run they belong to. Fails with
/// [`Error::Format`] when any element cannot be coerced to an integer; an
/// empty input yields an empty output.
pub fn summarize<T: RangeValue>(indices: &[T]) -> Result<Vec<String>> {
    let mut numbers = indices
        .iter()
        .enumerate()
        .map(|(pos, value)| {
            value
                .to_index()
                .ok_or_else(|| {
                    Error::format(format!("episode index at position {pos} is not an integer"))
                })
        })
        .collect::<Result<Vec<i64>>>()?;

    numbers.sort_unstable();

    let mut tokens = Vec::new();
    let mut iter = numbers.into_iter();
    let Some(first) = iter.next() else {
        return Ok(tokens);
    };

    let (mut start, mut end) = (first, first);
    for n in iter {
        if n == end || n == end + 1 {
            end = n;
        } else {
            tokens.push(token(start, end));
            start = n;
            end = n;
        }
    }
    tokens.push(token(start, end));

    Ok(tokens)
}

fn token(start: i64, end: i64) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}
