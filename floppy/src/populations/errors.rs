use std::error::Error;
use std::fmt;

/// An error type indicating that a simulation
/// cannot be built from the given configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A probability-like field lies outside [0, 1].
    ProbabilityOutOfRange(&'static str, f32),
    /// A field that must be strictly positive is not.
    NonPositive(&'static str),
    /// A field that must not be negative is.
    Negative(&'static str),
    /// The gap plus its margins is taller than the screen.
    GapDoesNotFit {
        screen_height: i32,
        gap_size: i32,
        gap_margin: i32,
    },
    /// An agent is larger than the screen.
    AgentDoesNotFit {
        agent_size: i32,
        screen_width: i32,
        screen_height: i32,
    },
    /// The spawn delay multiplier range is empty.
    EmptyMultiplierRange(u32, u32),
    /// More seed policies than agents were supplied.
    TooManySeeds { seeds: usize, size: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbabilityOutOfRange(name, value) => {
                write!(f, "{} must lie in [0, 1], got {}", name, value)
            }
            Self::NonPositive(name) => write!(f, "{} must be strictly positive", name),
            Self::Negative(name) => write!(f, "{} must not be negative", name),
            Self::GapDoesNotFit {
                screen_height,
                gap_size,
                gap_margin,
            } => write!(
                f,
                "gap of {} with margins of {} does not fit in a screen {} high",
                gap_size, gap_margin, screen_height
            ),
            Self::AgentDoesNotFit {
                agent_size,
                screen_width,
                screen_height,
            } => write!(
                f,
                "agent of size {} does not fit in a {}x{} screen",
                agent_size, screen_width, screen_height
            ),
            Self::EmptyMultiplierRange(min, max) => {
                write!(f, "empty spawn multiplier range {}..={}", min, max)
            }
            Self::TooManySeeds { seeds, size } => write!(
                f,
                "{} seed policies supplied for a population of {}",
                seeds, size
            ),
        }
    }
}

impl Error for ConfigError {}
