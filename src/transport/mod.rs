//! WebSocket transport to the host process.
//!
//! The picker itself only talks to channels. This module bridges those
//! channels to a host process over a localhost WebSocket.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Page (Rust)    │                              │  Host process   │
//! │                 │         WebSocket            │                 │
//! │  PendingServer  │◄────────────────────────────►│  capture,       │
//! │  → HostConnection│      localhost:PORT          │  save, open     │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `PendingServer::bind` - Bind to localhost with random port
//! 2. Hand the WebSocket URL to the host process
//! 3. `PendingServer::accept` - Wait for the host, attach the picker's outbox
//! 4. `HostConnection::set_event_sink` - Route host events to the picker
//! 5. `HostConnection::shutdown` - Close the socket
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `server` | WebSocket server binding and acceptance |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// WebSocket server the host connects to.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{EventSink, HostConnection};
pub use server::PendingServer;
