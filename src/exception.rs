//! Captured error chains, the payload [`ErrorEvent`](crate::ErrorEvent) flattens.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

/// A snapshot of an error and, optionally, the error that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    type_name: String,
    message: String,
    stack: Option<String>,
    inner: Option<Box<Exception>>,
}

impl Exception {
    /// Describe an error by hand.
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), message: message.into(), stack: None, inner: None }
    }

    /// Capture `error` and its whole `source()` chain, naming sources from
    /// [`TypeNames::default`].
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        Self::from_error_with(error, &TypeNames::default())
    }

    /// Capture `error` and its whole `source()` chain.
    ///
    /// The outermost type name is the short form of the static type `E`.
    /// Sources are only visible as `dyn Error`; each is named by the first
    /// type in `names` it downcasts to, or [`UNNAMED_SOURCE`] when none match.
    /// A registered type therefore gets the same name at any depth.
    pub fn from_error_with<E: Error + ?Sized>(error: &E, names: &TypeNames) -> Self {
        let mut causes = Vec::new();
        let mut cursor = error.source();
        while let Some(source) = cursor {
            causes.push(Exception::new(names.name_of(source), source.to_string()));
            cursor = source.source();
        }

        let mut inner = None;
        for mut cause in causes.into_iter().rev() {
            cause.inner = inner;
            inner = Some(Box::new(cause));
        }
        Exception {
            type_name: short_type_name(std::any::type_name::<E>()).to_string(),
            message: error.to_string(),
            stack: None,
            inner,
        }
    }

    /// Attach a stack trace.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Attach `backtrace` as the stack, if it was actually captured.
    pub fn with_backtrace(mut self, backtrace: &Backtrace) -> Self {
        if backtrace.status() == BacktraceStatus::Captured {
            self.stack = Some(backtrace.to_string());
        }
        self
    }

    /// Set the error that caused this one.
    pub fn with_inner(mut self, inner: Exception) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    /// Type name of this error.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stack trace, if one was attached.
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Direct cause, if any.
    pub fn inner(&self) -> Option<&Exception> {
        self.inner.as_deref()
    }

    /// Innermost cause; `self` when there is no inner error.
    pub fn root(&self) -> &Exception {
        let mut current = self;
        while let Some(inner) = current.inner() {
            current = inner;
        }
        current
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

impl<E: Error> From<&E> for Exception {
    fn from(error: &E) -> Self {
        Exception::from_error(error)
    }
}

/// Last path segment of a `type_name`, keeping generic arguments intact.
fn short_type_name(full: &str) -> &str {
    let head_end = full.find('<').unwrap_or(full.len());
    let start = full[..head_end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}

/// Type name recorded for a source whose concrete type is not registered.
pub const UNNAMED_SOURCE: &str = "Error";

type Matcher = fn(&(dyn Error + 'static)) -> bool;

fn matches<T: Error + 'static>(error: &(dyn Error + 'static)) -> bool {
    error.is::<T>()
}

/// Error types that sources in a chain can be recognised as.
///
/// Names are the short form of `std::any::type_name`, the same form used for
/// the outermost error. The default set covers the common standard library
/// errors; register your own with [`with`](Self::with).
///
/// ```rust
/// use herald::exception::{Exception, TypeNames};
///
/// #[derive(Debug, thiserror::Error)]
/// enum StoreError {
///     #[error("timed out")]
///     Timeout,
/// }
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("save failed")]
/// struct SaveFailed(#[source] StoreError);
///
/// let names = TypeNames::default().with::<StoreError>();
/// let e = Exception::from_error_with(&SaveFailed(StoreError::Timeout), &names);
/// assert_eq!(e.root().type_name(), "StoreError");
/// ```
#[derive(Clone)]
pub struct TypeNames {
    entries: Vec<(Matcher, &'static str)>,
}

impl TypeNames {
    /// No registered types; every source is [`UNNAMED_SOURCE`].
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Register `T`. Earlier registrations win when several match.
    pub fn with<T: Error + 'static>(mut self) -> Self {
        self.entries.push((matches::<T>, short_type_name(std::any::type_name::<T>())));
        self
    }

    /// Name recorded for `error`.
    pub fn name_of(&self, error: &(dyn Error + 'static)) -> &'static str {
        self.entries
            .iter()
            .find(|(matcher, _)| matcher(error))
            .map_or(UNNAMED_SOURCE, |(_, name)| *name)
    }
}

impl Default for TypeNames {
    fn default() -> Self {
        Self::empty()
            .with::<std::io::Error>()
            .with::<std::fmt::Error>()
            .with::<std::num::ParseIntError>()
            .with::<std::num::ParseFloatError>()
            .with::<std::num::TryFromIntError>()
            .with::<std::str::Utf8Error>()
            .with::<std::str::ParseBoolError>()
            .with::<std::string::FromUtf8Error>()
            .with::<std::char::ParseCharError>()
            .with::<std::net::AddrParseError>()
            .with::<std::env::VarError>()
            .with::<std::time::SystemTimeError>()
    }
}

impl fmt::Debug for TypeNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|(_, name)| name)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ConnectionLost {
        host: String,
    }

    impl fmt::Display for ConnectionLost {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection to {} lost", self.host)
        }
    }

    impl Error for ConnectionLost {}

    #[derive(Debug, thiserror::Error)]
    #[error("query failed")]
    struct QueryFailed {
        #[source]
        cause: ConnectionLost,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct RequestFailed {
        #[source]
        cause: QueryFailed,
    }

    fn request_failed() -> RequestFailed {
        let lost = ConnectionLost { host: "db".into() };
        RequestFailed { cause: QueryFailed { cause: lost } }
    }

    #[test]
    fn single_error_is_its_own_root() {
        let e = Exception::from_error(&ConnectionLost { host: "db".into() });
        assert_eq!(e.type_name(), "ConnectionLost");
        assert_eq!(e.message(), "connection to db lost");
        assert!(e.inner().is_none());
        assert_eq!(e.root(), &e);
    }

    #[test]
    fn source_chain_is_captured_in_order() {
        let err = request_failed();
        let names = TypeNames::default().with::<QueryFailed>().with::<ConnectionLost>();
        let e = Exception::from_error_with(&err, &names);
        assert_eq!(e.type_name(), "RequestFailed");
        let mid = e.inner().unwrap();
        assert_eq!(mid.type_name(), "QueryFailed");
        assert_eq!(mid.message(), "query failed");
        assert_eq!(e.root().type_name(), "ConnectionLost");
        assert_eq!(e.root().message(), "connection to db lost");
    }

    #[test]
    fn unregistered_sources_use_generic_name() {
        let err = request_failed();
        let e = Exception::from_error(&err);
        assert_eq!(e.type_name(), "RequestFailed");
        assert_eq!(e.inner().unwrap().type_name(), UNNAMED_SOURCE);
        assert_eq!(e.root().type_name(), UNNAMED_SOURCE);
        assert_eq!(e.root().message(), "connection to db lost");
    }

    #[derive(Debug, thiserror::Error)]
    enum DbError {
        #[error("query timed out")]
        Timeout,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("load failed")]
    struct LoadFailed(#[source] DbError);

    #[derive(Debug, thiserror::Error)]
    #[error("read failed")]
    struct ReadFailed(#[source] std::io::Error);

    #[test]
    fn io_error_root_is_named_like_io_error_top() {
        let disk_full = || std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let top = Exception::from_error(&disk_full());
        let wrapped = ReadFailed(disk_full());
        let e = Exception::from_error(&wrapped);
        assert_eq!(e.root().type_name(), top.type_name());
        assert_eq!(e.root().type_name(), "Error");
        assert_eq!(e.root().message(), "disk full");

        let os = ReadFailed(std::io::Error::from_raw_os_error(2));
        assert_eq!(Exception::from_error(&os).root().type_name(), "Error");
    }

    #[test]
    fn enum_root_never_records_variant_name() {
        let e = Exception::from_error(&LoadFailed(DbError::Timeout));
        assert_eq!(e.root().type_name(), UNNAMED_SOURCE);
        assert_ne!(e.root().type_name(), "Timeout");

        let names = TypeNames::default().with::<DbError>();
        let e = Exception::from_error_with(&LoadFailed(DbError::Timeout), &names);
        let top = Exception::from_error(&DbError::Timeout);
        assert_eq!(e.root().type_name(), "DbError");
        assert_eq!(e.root().type_name(), top.type_name());
        assert_eq!(e.root().message(), "query timed out");
    }

    #[test]
    fn first_registration_wins() {
        let names = TypeNames::empty().with::<DbError>().with::<DbError>();
        assert_eq!(names.name_of(&DbError::Timeout), "DbError");
        assert_eq!(TypeNames::empty().name_of(&DbError::Timeout), UNNAMED_SOURCE);
        assert!(format!("{:?}", names).contains("DbError"));
    }

    #[test]
    fn short_type_name_strips_module_path() {
        assert_eq!(short_type_name("std::io::error::Error"), "Error");
        assert_eq!(short_type_name("Plain"), "Plain");
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper<b::Inner>");
    }

    #[test]
    fn manual_chain_root_walks_to_innermost() {
        let e = Exception::new("Outer", "o")
            .with_inner(Exception::new("Middle", "m").with_inner(Exception::new("Inner", "i")));
        assert_eq!(e.root().type_name(), "Inner");
        assert_eq!(e.to_string(), "Outer: o");
    }

    #[test]
    fn disabled_backtrace_leaves_stack_empty() {
        let e = Exception::new("T", "m").with_backtrace(&Backtrace::disabled());
        assert!(e.stack().is_none());
        let e = e.with_stack("at main");
        assert_eq!(e.stack(), Some("at main"));
    }
}
