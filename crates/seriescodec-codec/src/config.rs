/// Default maximum encoded message size: 64 MiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// Configuration for a [`Codec`](crate::Codec).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum number of schema states retained. `None` keeps every state
    /// until a decode garbage-collects it. The current state is never dropped.
    pub history_limit: Option<usize>,
    /// Upper bound for an encoded message, and for any single channel
    /// payload declared inside a message being decoded. Default: 64 MiB.
    pub max_message_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}
