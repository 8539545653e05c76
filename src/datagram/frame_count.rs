use derive_more::{Display, From, Into};

/// Wrapping sequence number identifying the frame a datagram belongs to.
///
/// # Examples
///
/// ```
/// use wifiscope::datagram::FrameCount;
/// let count = FrameCount::new(100);
/// assert_eq!(count.get(), 100);
/// assert!(count.is_multiple_of(50));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From, Into)]
#[display("{_0}")]
pub struct FrameCount(u16);

impl FrameCount {
    /// Create a new frame counter value.
    #[must_use]
    pub const fn new(value: u16) -> Self { Self(value) }

    /// Return the raw counter value.
    #[must_use]
    pub const fn get(self) -> u16 { self.0 }

    /// Report whether the counter is an exact multiple of `interval`.
    ///
    /// A zero interval never matches.
    #[must_use]
    pub const fn is_multiple_of(self, interval: u16) -> bool {
        interval != 0 && self.0 % interval == 0
    }
}
