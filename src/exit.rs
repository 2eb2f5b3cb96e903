use anyhow::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Clean = 0,
    Usage = 2,
    Diagnostics = 3,
    Unreadable = 10,
}

impl Status {
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn hint(self) -> &'static str {
        match self {
            Status::Clean => "nothing to do",
            Status::Usage => "check the flags, the config file, and `SARIF_ALERTS_*` variables",
            Status::Diagnostics => "re-run with `--verbose` for every diagnostic",
            Status::Unreadable => "make sure the input exists and is a SARIF JSON document",
        }
    }
}

#[derive(Debug)]
pub struct Failure {
    status: Status,
    inner: Error,
}

impl Failure {
    pub fn status(&self) -> Status {
        self.status
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

// Skip the wrapped error itself: it prints as this one.
impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

pub trait WithStatus<T> {
    fn with_status(self, status: Status) -> anyhow::Result<T>;
}

impl<T, E> WithStatus<T> for Result<T, E>
where
    E: Into<Error>,
{
    fn with_status(self, status: Status) -> anyhow::Result<T> {
        self.map_err(|err| {
            Failure {
                status,
                inner: err.into(),
            }
            .into()
        })
    }
}

pub fn fail(status: Status, message: impl fmt::Display) -> Error {
    Failure {
        status,
        inner: anyhow::anyhow!("{message}"),
    }
    .into()
}

pub fn status_of(err: &Error) -> Status {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Failure>())
        .map_or(Status::Unreadable, Failure::status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn statuses_map_to_process_codes() {
        assert_eq!(status_of(&fail(Status::Usage, "bad")).code(), 2);
        assert_eq!(status_of(&fail(Status::Diagnostics, "1 diagnostic")).code(), 3);
        assert_eq!(status_of(&anyhow::anyhow!("untyped")).code(), 10);
        assert_eq!(Status::Clean.code(), 0);
    }

    #[test]
    fn status_survives_added_context() {
        let err = Err::<(), _>(anyhow::anyhow!("no such file"))
            .with_status(Status::Usage)
            .context("loading config")
            .unwrap_err();
        assert_eq!(status_of(&err), Status::Usage);
    }

    #[test]
    fn tagging_does_not_repeat_the_message_in_the_chain() {
        let err = Err::<(), _>(anyhow::anyhow!("root cause"))
            .context("reading log")
            .with_status(Status::Unreadable)
            .unwrap_err();
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        assert_eq!(chain, vec!["reading log", "root cause"]);
    }
}
