/// Command enum and per-event handlers
pub mod handlers;
/// Conversion of keyboard descriptors into Telegram inline keyboards
pub mod keyboards;
/// Channel membership lookups over `getChatMember`
pub mod membership;
/// Resilient messaging with automatic retry for Telegram API operations
pub mod resilient;
/// `ChatTransport` bound to a Telegram chat
pub mod transport;

pub use membership::TelegramMembershipChecker;
pub use transport::TelegramChatTransport;
