//! Routing-key constants for the log bridge.
//!
//! Grounded on `modules/EventBus/logger.go`'s `RoutingKeyBase` and the four
//! `*LogsTopic` constants.

/// The routing-key prefix every log event is published under.
pub const ROUTING_KEY_BASE: &str = "type.log.level.";

/// Matches every log event regardless of level.
pub const ALL_LOGS_TOPIC: &str = "type.log.level.*";

/// Matches only `debug`-level log events.
pub const DEBUG_LOGS_TOPIC: &str = "type.log.level.debug.*";

/// Matches only `info`-level log events.
pub const INFO_LOGS_TOPIC: &str = "type.log.level.info.*";

/// Matches only `warn`-level log events.
pub const WARN_LOGS_TOPIC: &str = "type.log.level.warn.*";

/// Matches only `error`-level log events.
pub const ERROR_LOGS_TOPIC: &str = "type.log.level.error.*";
