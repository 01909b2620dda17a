//! QuizDash Shared - Wire types for the admin console and the game server
//!
//! This crate contains all types exchanged between the game server and the
//! admin dashboard:
//! - REST request/response DTOs (sessions, users, questions, statistics)
//! - Push channel payloads (`dashboard-update` room snapshots)
//! - The Engine.IO / Socket.IO packet codec used by the push channel
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, chrono, thiserror and tracing
//! 2. **No I/O** - Pure data types, serialization and framing
//! 3. **WASM compatible** - Must compile for both native and wasm32 targets
//! 4. **Lenient decoding** - The server omits fields freely; missing values
//!    fall back to defaults instead of failing the whole payload

pub mod channel_protocol;
pub mod messages;
pub mod requests;
pub mod responses;
pub mod types;

// =============================================================================
// Push channel
// =============================================================================
pub use channel_protocol::{
    EnginePacket, Namespace, OpenHandshake, ProtocolError, SocketPacket, ENGINE_IO_VERSION,
    SOCKET_IO_PATH,
};
pub use messages::{events, DashboardUpdate, DecodedUpdate, MalformedUpdate, RejectedRoom};

// =============================================================================
// REST types
// =============================================================================
pub use requests::{CreateUserRequest, LoginRequest, RandomQuestionsQuery, RegisterAdminRequest};
pub use responses::{
    parse_timestamp,
    AuthenticatedUser, CurrentQuestion, DashboardSummary, GlobalStats, PlayerData, QuestionData,
    Room, TopCategory, TopWinner, UserData,
};
pub use types::{EntityId, Role, RoomStatus};
