#![forbid(unsafe_code)]

//! Tether error model and graceful degradation.
//!
//! Nothing that goes wrong while positioning a popup is fatal to the host.
//! Each subsystem reports its own typed error; [`Error`] unifies them and
//! [`Error::degradation`] tells the caller how to carry on.

use std::fmt;

use tether_layout::PriorityError;
use tether_runtime::{ConfigError, MeasureError, RegistryError};

/// Top-level error type for tether hosts.
#[derive(Debug)]
pub enum Error {
    /// A priority list named an unknown side.
    Priority(PriorityError),
    /// The host failed to measure an element.
    Measure(MeasureError),
    /// Options could not be loaded or were out of range.
    Config(ConfigError),
    /// A registry operation named a popup that is not live.
    Registry(RegistryError),
}

/// Standard result type for tether APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// How to carry on after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degradation {
    /// Leave state alone and retry on the next reconcile tick.
    RetryNextTick,
    /// Keep the popup alive but render nothing.
    SuppressPopup,
    /// Drop the reply or request and continue.
    DiscardReply,
    /// Fall back to the built-in defaults.
    UseDefaults,
}

impl Error {
    /// Determine the graceful degradation action for this error.
    pub fn degradation(&self) -> Degradation {
        match self {
            Self::Priority(PriorityError::UnknownPosition(_)) => Degradation::UseDefaults,

            Self::Measure(MeasureError::Unmounted) => Degradation::RetryNextTick,
            Self::Measure(MeasureError::Failed(_)) => Degradation::RetryNextTick,

            Self::Config(_) => Degradation::UseDefaults,

            Self::Registry(RegistryError::UnknownPopup(_)) => Degradation::DiscardReply,
        }
    }

    /// Error type label for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Priority(_) => "priority",
            Self::Measure(_) => "measure",
            Self::Config(_) => "config",
            Self::Registry(_) => "registry",
        }
    }

    /// Whether the host can keep running. Always true.
    pub fn is_recoverable(&self) -> bool {
        match self.degradation() {
            Degradation::RetryNextTick
            | Degradation::SuppressPopup
            | Degradation::DiscardReply
            | Degradation::UseDefaults => true,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Priority(err) => write!(f, "priority list: {err}"),
            Self::Measure(err) => write!(f, "measurement: {err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "registry: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Priority(err) => Some(err),
            Self::Measure(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Registry(err) => Some(err),
        }
    }
}

impl From<PriorityError> for Error {
    fn from(err: PriorityError) -> Self {
        Self::Priority(err)
    }
}

impl From<MeasureError> for Error {
    fn from(err: MeasureError) -> Self {
        Self::Measure(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_runtime::PopupId;

    fn all_errors() -> Vec<Error> {
        vec![
            PriorityError::UnknownPosition("middle".into()).into(),
            MeasureError::Unmounted.into(),
            MeasureError::Failed("layout pending".into()).into(),
            ConfigError::Invalid("alley_width".into()).into(),
            RegistryError::UnknownPopup(PopupId::new(3)).into(),
        ]
    }

    #[test]
    fn every_error_is_recoverable() {
        for err in all_errors() {
            assert!(err.is_recoverable(), "{err}");
        }
    }

    #[test]
    fn degradation_mapping() {
        let actions: Vec<_> = all_errors().iter().map(Error::degradation).collect();
        assert_eq!(
            actions,
            [
                Degradation::UseDefaults,
                Degradation::RetryNextTick,
                Degradation::RetryNextTick,
                Degradation::UseDefaults,
                Degradation::DiscardReply,
            ]
        );
    }

    #[test]
    fn labels_and_messages() {
        let labels: Vec<_> = all_errors().iter().map(Error::error_type).collect();
        assert_eq!(labels, ["priority", "measure", "measure", "config", "registry"]);

        let err = Error::from(PriorityError::UnknownPosition("middle".into()));
        assert!(err.to_string().contains("middle"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn question_mark_converts() {
        fn parse(s: &str) -> Result<tether_layout::PriorityList> {
            Ok(s.parse()?)
        }
        assert!(parse("top, left").is_ok());
        assert!(matches!(parse("up"), Err(Error::Priority(_))));
    }
}
