/// Read access to environment variables.
///
/// Settings resolution goes through this trait instead of `std::env` so that
/// lookups can be served from a fixed map in tests.
pub trait Environment {
    /// Value of `key`, or `None` if it is not set.
    fn var(&self, key: &str) -> Option<String>;
}

/// The environment of the running process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        // non-UTF-8 values are passed through lossily rather than dropped
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
impl Environment for std::collections::HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
