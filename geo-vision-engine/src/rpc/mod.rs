//! JSON-RPC 2.0 communication layer for web frontend integration.
//!
//! Implements bidirectional messaging between the Bevy engine and its hosting page via
//! iframe postMessage, supporting both request-response and notification patterns.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Adding New RPC Methods
//!
//! Add a case to `handle_rpc_request()` and a handler returning
//! `Result<Value, RpcError>`. Handlers read the presentation through
//! `RpcContext` and change it only by dispatching a `PresentationAction`:
//!
//! ```rust,ignore
//! "go_to_step" => parse_step_index(&request.params, context)
//!     .and_then(|index| handle_navigation(context, PresentationAction::GoTo(index), dispatch)),
//! ```
//!
//! From the host page:
//!
//! ```typescript
//! iframe.contentWindow.postMessage(JSON.stringify({
//!   jsonrpc: "2.0",
//!   method: "set_color_mode",
//!   params: { mode: "assay" },
//!   id: 1
//! }), "*");
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32002`: Presentation not ready (layer discovery still running)
//!
//! ## Existing Methods
//!
//! ### Navigation
//! - `next_step` / `previous_step`: Step forward or back, saturating at the ends
//! - `go_to_step`: Jump to a step by `index`
//! - `set_color_mode`: Switch drillhole colouring (`mode`: `lithology` | `assay`)
//!
//! ### Queries
//! - `get_steps`: Offered steps with tag, title and description
//! - `get_presentation_state`: Current step, colour mode, visible layer, legend, load progress
//!
//! ### Notifications (Bevy → frontend)
//! - `presentation_state`: Same payload as `get_presentation_state`, pushed after every change
//!
//! Navigation requests are acknowledged immediately; the resulting state
//! arrives as a `presentation_state` notification.

/// JSON-RPC 2.0 bidirectional communication system for host page integration.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
