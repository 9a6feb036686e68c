use std::fmt;

/// Blocking operations a driver performs against its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Start,
    /// Wait for a started job to stop on its own.
    Await,
    Stop,
    Delete,
    TestConnection,
}

impl Operation {
    /// Return label value for logs and metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Start => "start",
            Operation::Await => "await",
            Operation::Stop => "stop",
            Operation::Delete => "delete",
            Operation::TestConnection => "test-connection",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
