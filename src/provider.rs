use std::fmt::{self, Debug, Display, Formatter};

use chrono::{DateTime, Local, TimeZone};

use crate::ConfigError;

/// A source of text to show on the terminal.
///
/// Called once per update with no arguments; returns the lines to draw, row 0 first.
/// Implementations may keep private state between calls (for instance to cycle through
/// several sub-metrics), which persists across reconnects within a process.
///
/// # Examples
///
/// ```
/// use unolcd::Provider;
///
/// #[derive(Debug, Default)]
/// struct Counter {
///     count: u64,
/// }
///
/// impl Provider for Counter {
///     fn name(&self) -> &str {
///         "counter"
///     }
///
///     fn description(&self) -> &str {
///         "Counts updates"
///     }
///
///     fn lines(&mut self) -> Vec<String> {
///         self.count += 1;
///         vec!["Updates".into(), self.count.to_string()]
///     }
/// }
///
/// let mut counter = Counter::default();
/// assert_eq!(vec!["Updates", "1"], counter.lines());
/// assert_eq!(vec!["Updates", "2"], counter.lines());
/// ```
pub trait Provider {
    /// Returns the lowercase name used to select this provider.
    fn name(&self) -> &str;

    /// Returns a short human-readable description for listings.
    fn description(&self) -> &str;

    /// Produces the next snapshot of lines to display.
    fn lines(&mut self) -> Vec<String>;
}

// Provide a Debug representation so types that contain trait objects can derive Debug.
impl Debug for dyn Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<Provider {}>", self.name())
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }

    fn lines(&mut self) -> Vec<String> {
        (**self).lines()
    }
}

/// Adapts a closure into a [`Provider`].
///
/// # Examples
///
/// ```
/// use unolcd::{FnProvider, Provider};
///
/// let mut provider = FnProvider::new("hello", "Greets the world", || vec!["Hello,".into(), "world!".into()]);
/// assert_eq!("hello", provider.name());
/// assert_eq!(vec!["Hello,", "world!"], provider.lines());
/// ```
pub struct FnProvider<F> {
    name: String,
    description: String,
    f: F,
}

impl<F: FnMut() -> Vec<String>> FnProvider<F> {
    /// Creates a new `FnProvider` that calls `f` for each update.
    pub fn new<N: Into<String>, D: Into<String>>(name: N, description: D, f: F) -> Self {
        FnProvider {
            name: name.into(),
            description: description.into(),
            f,
        }
    }
}

impl<F> Debug for FnProvider<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProvider").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<F: FnMut() -> Vec<String>> Provider for FnProvider<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn lines(&mut self) -> Vec<String> {
        (self.f)()
    }
}

/// Shows the local date on the first row and the time on the second.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use unolcd::TimeProvider;
///
/// let moment = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 30).unwrap();
/// assert_eq!(vec!["Sat Mar 09 2024", "07:05:30"], TimeProvider::format(&moment));
/// ```
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct TimeProvider;

impl TimeProvider {
    /// Formats an arbitrary moment the same way [`lines`](Provider::lines) formats the current one.
    pub fn format<Tz: TimeZone>(moment: &DateTime<Tz>) -> Vec<String>
    where
        Tz::Offset: Display,
    {
        vec![
            moment.format("%a %b %d %Y").to_string(),
            moment.format("%H:%M:%S").to_string(),
        ]
    }
}

impl Provider for TimeProvider {
    fn name(&self) -> &str {
        "time"
    }

    fn description(&self) -> &str {
        "Current local date and time"
    }

    fn lines(&mut self) -> Vec<String> {
        TimeProvider::format(&Local::now())
    }
}

type Constructor = Box<dyn Fn() -> Box<dyn Provider>>;

struct Entry {
    name: String,
    description: String,
    constructor: Constructor,
}

/// Maps provider names to constructors so they can be chosen from configuration.
///
/// Names are stored lowercase and looked up case-insensitively. Entries keep
/// their registration order, which is also the listing order.
///
/// # Examples
///
/// ```
/// use unolcd::{ConfigError, FnProvider, Registry};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// #
/// let mut registry = Registry::builtin();
/// registry.register("blank", "Nothing at all", || Box::new(FnProvider::new("blank", "Nothing at all", Vec::new)));
///
/// let providers = registry.create_all(["Time", "blank"])?;
/// assert_eq!(2, providers.len());
///
/// assert!(matches!(registry.create("cpu"), Err(ConfigError::UnknownProvider { .. })));
/// #
/// # Ok(()) }
/// ```
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry { entries: vec![] }
    }

    /// Creates a registry containing the built-in providers.
    pub fn builtin() -> Self {
        let mut registry = Registry::new();
        let time = TimeProvider;
        registry.register(time.name(), time.description(), || Box::new(TimeProvider));
        registry
    }

    /// Adds a provider, replacing any existing entry with the same name.
    pub fn register<N, D, F>(&mut self, name: N, description: D, constructor: F)
    where
        N: AsRef<str>,
        D: Into<String>,
        F: Fn() -> Box<dyn Provider> + 'static,
    {
        let entry = Entry {
            name: name.as_ref().to_lowercase(),
            description: description.into(),
            constructor: Box::new(constructor),
        };

        match self.entries.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Constructs a new instance of the named provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProvider`] if no provider has that name.
    pub fn create(&self, name: &str) -> Result<Box<dyn Provider>, ConfigError> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| (entry.constructor)())
            .ok_or_else(|| ConfigError::UnknownProvider { name: name.into() })
    }

    /// Constructs every named provider, in order. Names may repeat.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProvider`] for the first name that is not registered.
    pub fn create_all<I, S>(&self, names: I) -> Result<Vec<Box<dyn Provider>>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| self.create(name.as_ref())).collect()
    }

    /// Iterates over `(name, description)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|entry| (entry.name.as_str(), entry.description.as_str()))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::builtin()
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter().map(|entry| &entry.name)).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn time_format() {
        let moment = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(vec!["Fri Dec 31 1999", "23:59:59"], TimeProvider::format(&moment));
    }

    #[test]
    fn time_format_uses_given_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let moment = Utc.with_ymd_and_hms(1999, 12, 31, 23, 0, 0).unwrap().with_timezone(&offset);
        assert_eq!(vec!["Sat Jan 01 2000", "01:00:00"], TimeProvider::format(&moment));
    }

    #[test]
    fn time_lines_fit_default_width() {
        let lines = TimeProvider.lines();
        assert_eq!(2, lines.len());
        assert!(lines.iter().all(|line| line.len() <= 16));
    }

    #[test]
    fn fn_provider_keeps_state() {
        let mut calls = 0;
        let mut provider = FnProvider::new("calls", "", move || {
            calls += 1;
            vec![calls.to_string()]
        });
        assert_eq!(vec!["1"], provider.lines());
        assert_eq!(vec!["2"], provider.lines());
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = Registry::builtin();
        assert_eq!("time", registry.create("TIME").unwrap().name());
        assert_eq!("time", registry.create("Time").unwrap().name());
    }

    #[test]
    fn unknown_provider() {
        let registry = Registry::builtin();
        let error = registry.create_all(["time", "cpu", "disk"]).unwrap_err();
        assert_eq!(ConfigError::UnknownProvider { name: "cpu".into() }, error);
    }

    #[test]
    fn listing_in_registration_order() {
        let mut registry = Registry::builtin();
        registry.register("Zeta", "Last", || Box::new(TimeProvider));
        registry.register("alpha", "First?", || Box::new(TimeProvider));
        let names: Vec<_> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(vec!["time", "zeta", "alpha"], names);
    }

    #[test]
    fn register_replaces() {
        let mut registry = Registry::builtin();
        registry.register("TIME", "Replaced", || Box::new(FnProvider::new("time", "Replaced", Vec::new)));
        assert_eq!(vec![("time", "Replaced")], registry.iter().collect::<Vec<_>>());
        assert!(registry.create("time").unwrap().lines().is_empty());
    }

    #[test]
    fn debug() {
        assert_eq!("[\"time\"]", format!("{:?}", Registry::builtin()));
        let provider: Box<dyn Provider> = Box::new(TimeProvider);
        assert_eq!("<Provider time>", format!("{:?}", provider));
    }
}
