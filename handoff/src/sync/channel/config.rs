use super::Channel;
use super::error::ConfigError;

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// How many items a channel buffers before `send` suspends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Capacity {
    /// No buffer: every `send` waits for a matching `receive`.
    #[default]
    Rendezvous,

    /// Up to `N` items are buffered.
    Bounded(NonZeroUsize),
}

impl Capacity {
    /// Builds a capacity from a buffer size, `0` meaning rendezvous.
    ///
    /// The buffer grows on demand, so a large size costs nothing up front.
    pub fn new(size: usize) -> Self {
        match NonZeroUsize::new(size) {
            Some(n) => Capacity::Bounded(n),
            None => Capacity::Rendezvous,
        }
    }

    /// Number of buffer slots (`0` for rendezvous).
    pub fn get(self) -> usize {
        match self {
            Capacity::Rendezvous => 0,
            Capacity::Bounded(n) => n.get(),
        }
    }

    pub fn is_rendezvous(self) -> bool {
        self == Capacity::Rendezvous
    }
}

impl TryFrom<i64> for Capacity {
    type Error = ConfigError;

    fn try_from(size: i64) -> Result<Self, Self::Error> {
        let size = usize::try_from(size).map_err(|_| ConfigError::NegativeCapacity(size))?;
        Ok(Capacity::new(size))
    }
}

impl From<usize> for Capacity {
    fn from(size: usize) -> Self {
        Capacity::new(size)
    }
}

impl FromStr for Capacity {
    type Err = ConfigError;

    /// Accepts `rendezvous` (any case) or a decimal integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("rendezvous") {
            return Ok(Capacity::Rendezvous);
        }

        let size = s
            .parse::<i64>()
            .map_err(|_| ConfigError::Unparsable(s.to_owned()))?;

        Capacity::try_from(size)
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Rendezvous => f.write_str("rendezvous"),
            Capacity::Bounded(n) => write!(f, "{n}"),
        }
    }
}

/// Builder for configuring and creating a channel.
///
/// # Examples
///
/// ```rust,ignore
/// let channel = ChannelBuilder::new()
///     .capacity_from("16".parse()?)
///     .build::<String>();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChannelBuilder {
    capacity: Capacity,
}

impl ChannelBuilder {
    /// Creates a builder for a rendezvous channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer size. `0` keeps the channel rendezvous.
    pub fn capacity(mut self, size: usize) -> Self {
        self.capacity = Capacity::new(size);
        self
    }

    /// Sets an already validated capacity, for instance one parsed from a
    /// configuration string.
    pub fn capacity_from(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds the channel.
    pub fn build<T>(self) -> Channel<T> {
        Channel::with_capacity(self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rendezvous() {
        assert_eq!(Capacity::new(0), Capacity::Rendezvous);
        assert_eq!(Capacity::default(), Capacity::Rendezvous);
        assert_eq!(Capacity::Rendezvous.get(), 0);
    }

    #[test]
    fn negative_capacity_is_rejected() {
        assert_eq!(
            Capacity::try_from(-1i64),
            Err(ConfigError::NegativeCapacity(-1))
        );
        assert_eq!(
            "-3".parse::<Capacity>(),
            Err(ConfigError::NegativeCapacity(-3))
        );
    }

    #[test]
    fn huge_capacity_is_accepted_without_preallocation() {
        let channel = ChannelBuilder::new().capacity(usize::MAX).build::<u8>();

        assert_eq!(channel.capacity().get(), usize::MAX);
        assert!(channel.try_send(1).is_ok());
        assert_eq!(channel.len(), 1);
    }

    #[test]
    fn builder_accepts_parsed_capacity() {
        let capacity: Capacity = "3".parse().unwrap();
        let channel = ChannelBuilder::new().capacity_from(capacity).build::<u8>();

        assert_eq!(channel.capacity(), Capacity::new(3));
    }

    #[test]
    fn parses_config_strings() {
        assert_eq!("rendezvous".parse::<Capacity>(), Ok(Capacity::Rendezvous));
        assert_eq!(" Rendezvous ".parse::<Capacity>(), Ok(Capacity::Rendezvous));
        assert_eq!("8".parse::<Capacity>().map(Capacity::get), Ok(8));
        assert!(matches!(
            "eight".parse::<Capacity>(),
            Err(ConfigError::Unparsable(s)) if s == "eight"
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for capacity in [Capacity::Rendezvous, Capacity::new(5)] {
            assert_eq!(capacity.to_string().parse::<Capacity>(), Ok(capacity));
        }
    }
}
