#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEmail(String);

/// # Type Driven Development
/// Making an incorrect usage pattern unrepresentable, by construction, is known as *type driven
/// development*. Once a `RecordEmail` exists, the rest of the application can rely on it being
/// shaped like an email address and never has to re-validate the raw string.
impl RecordEmail {
    /// Returns an instance of `RecordEmail` if the input satisfies all our validation constraints
    /// on email addresses, an error message otherwise.
    ///
    /// The constraint is deliberately shallow: a non-empty local part, a single `@`, a domain
    /// containing an interior dot, and no whitespace anywhere. Anything stricter belongs to the
    /// store, not to us.
    pub fn parse(s: String) -> Result<RecordEmail, String> {
        if is_well_formed(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{s} is not a valid email address."))
        }
    }
}

fn is_well_formed(s: &str) -> bool {
    if s.chars().any(|c| c.is_whitespace()) {
        return false;
    }

    // `splitn` caps the split at two pieces, so a second `@` would end up inside `domain`
    // and gets rejected below.
    let mut parts = s.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = match parts.next() {
        Some(domain) => domain,
        None => return false,
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // The domain needs a dot with at least one character on each side. `.` is a single byte,
    // so the byte-index arithmetic is safe even for multi-byte neighbours.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// The caller gets a shared reference to the inner string. This gives the caller **read-only**
/// access, they have no way to compromise our invariants!
impl AsRef<str> for RecordEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
