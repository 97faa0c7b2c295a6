//! Page size clamping.

/// Smallest page a client can request.
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest page a client can request.
pub const MAX_PAGE_SIZE: usize = 50;

/// Number of items per page, always within
/// [`MIN_PAGE_SIZE`]`..=`[`MAX_PAGE_SIZE`].
///
/// Out-of-range requests are clamped rather than rejected.
///
/// # Examples
///
/// ```
/// use pagination::{MAX_PAGE_SIZE, PageSize};
///
/// assert_eq!(PageSize::new(0).get(), 1);
/// assert_eq!(PageSize::new(500).get(), MAX_PAGE_SIZE);
/// assert_eq!(PageSize::parse_or(Some("abc"), 20).get(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageSize(usize);

impl PageSize {
    /// Clamp `requested` into the supported range.
    #[must_use]
    pub const fn new(requested: usize) -> Self {
        if requested < MIN_PAGE_SIZE {
            Self(MIN_PAGE_SIZE)
        } else if requested > MAX_PAGE_SIZE {
            Self(MAX_PAGE_SIZE)
        } else {
            Self(requested)
        }
    }

    /// Interpret a raw query value, falling back to `default` when the value
    /// has no leading integer or is not positive.
    ///
    /// Only the leading integer counts, so `"7.9"` reads as 7 and `"20abc"`
    /// as 20. Oversized numbers, including ones beyond `usize`, clamp to
    /// [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn parse_or(raw: Option<&str>, default: usize) -> Self {
        match raw.and_then(leading_integer) {
            Some(LeadingInteger::Positive(value)) => Self::new(value),
            Some(LeadingInteger::Overflow) => Self(MAX_PAGE_SIZE),
            Some(LeadingInteger::NotPositive) | None => Self::new(default),
        }
    }

    /// The clamped size.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Rows an adapter should fetch to learn whether another page exists.
    #[must_use]
    pub const fn lookahead(self) -> usize {
        self.0 + 1
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(MAX_PAGE_SIZE)
    }
}

enum LeadingInteger {
    Positive(usize),
    NotPositive,
    Overflow,
}

/// Read the integer prefix of `text`, ignoring leading whitespace and
/// anything after the digits.
fn leading_integer(text: &str) -> Option<LeadingInteger> {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = unsigned
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = unsigned.get(..end).filter(|digits| !digits.is_empty())?;
    if negative || digits.bytes().all(|byte| byte == b'0') {
        return Some(LeadingInteger::NotPositive);
    }
    Some(
        digits
            .parse::<usize>()
            .map_or(LeadingInteger::Overflow, LeadingInteger::Positive),
    )
}
