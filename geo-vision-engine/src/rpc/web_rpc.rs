use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::presentation::state_machine::PresentationEngine;
use crate::engine::presentation::step::ColourMode;
use crate::engine::systems::navigation::{
    CommandSource, PresentationAction, PresentationCommand, presentation_state_json,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication with the hosting page.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the frontend without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the frontend.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from frontend.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    // Write events using the non-deprecated method.
    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut presentation_commands: EventWriter<PresentationCommand>,
    engine: Option<Res<PresentationEngine>>,
    loading_progress: Res<LoadingProgress>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("RPC request: {}", request.method);
                let context = RpcContext {
                    engine: engine.as_deref(),
                    loading_progress: &loading_progress,
                };
                let mut dispatch = |action| {
                    presentation_commands.write(PresentationCommand {
                        action,
                        source: CommandSource::Rpc,
                    });
                };
                if let Some(response) = handle_rpc_request(&request, &context, &mut dispatch) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
                rpc_interface.queue_response(create_error_response(
                    serde_json::Value::Null,
                    -32600,
                    "Invalid request",
                    Some(serde_json::json!({"message": parse_error.to_string()})),
                ));
            }
        }
    }
}

/// Read-only view of the presentation for request handlers.
pub struct RpcContext<'a> {
    pub engine: Option<&'a PresentationEngine>,
    pub loading_progress: &'a LoadingProgress,
}

/// Handle individual RPC request and generate response based on method.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    dispatch: &mut impl FnMut(PresentationAction),
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "next_step" => handle_navigation(context, PresentationAction::Next, dispatch),
        "previous_step" => handle_navigation(context, PresentationAction::Previous, dispatch),
        "go_to_step" => parse_step_index(&request.params, context)
            .and_then(|index| handle_navigation(context, PresentationAction::GoTo(index), dispatch)),
        "set_color_mode" => parse_colour_mode(&request.params).and_then(|mode| {
            handle_navigation(context, PresentationAction::SetColourMode(mode), dispatch)
        }),
        "get_presentation_state" => handle_get_presentation_state(context),
        "get_steps" => handle_get_steps(context),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: -32601,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({"method": request.method})),
            })
        }
    };

    // Notifications (no id) get no response.
    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn require_engine<'a>(context: &RpcContext<'a>) -> Result<&'a PresentationEngine, RpcError> {
    context
        .engine
        .ok_or_else(|| RpcError::not_ready("Layer discovery still in progress"))
}

/// Queue a navigation command. The new state follows as a `presentation_state` notification.
fn handle_navigation(
    context: &RpcContext,
    action: PresentationAction,
    dispatch: &mut impl FnMut(PresentationAction),
) -> Result<serde_json::Value, RpcError> {
    require_engine(context)?;
    dispatch(action);
    info!("Presentation command queued: {:?}", action);

    Ok(serde_json::json!({
        "success": true
    }))
}

fn parse_step_index(params: &serde_json::Value, context: &RpcContext) -> Result<usize, RpcError> {
    #[derive(serde::Deserialize)]
    struct GoToParams {
        index: usize,
    }

    let params = serde_json::from_value::<GoToParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'index' parameter"))?;
    let engine = require_engine(context)?;
    if params.index >= engine.steps().len() {
        return Err(RpcError::invalid_params(&format!(
            "Step index {} out of range (0..{})",
            params.index,
            engine.steps().len()
        )));
    }
    Ok(params.index)
}

fn parse_colour_mode(params: &serde_json::Value) -> Result<ColourMode, RpcError> {
    #[derive(serde::Deserialize)]
    struct ColourModeParams {
        mode: String,
    }

    let params = serde_json::from_value::<ColourModeParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'mode' parameter"))?;
    ColourMode::from_string(&params.mode)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown colour mode: {}", params.mode)))
}

fn handle_get_presentation_state(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let engine = require_engine(context)?;
    Ok(presentation_state_json(engine, context.loading_progress))
}

fn handle_get_steps(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let engine = require_engine(context)?;
    let steps: Vec<serde_json::Value> = engine
        .steps()
        .iter()
        .map(|step| {
            serde_json::json!({
                "tag": step.tag(),
                "title": step.title(),
                "description": step.description(),
            })
        })
        .collect();

    Ok(serde_json::json!({
        "steps": steps
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to frontend.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (hosting page).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    /// Server-defined code for requests that arrive before the presentation exists.
    pub fn not_ready(message: &str) -> Self {
        Self {
            code: -32002,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::presentation::colour_policy::{ColourPolicy, GradeScale};
    use crate::engine::presentation::state_machine::DrillholeStyle;
    use crate::engine::presentation::step::{AssetLayer, PresentationStep};

    fn engine() -> PresentationEngine {
        PresentationEngine::new(
            vec![
                PresentationStep::Satellite,
                PresentationStep::LithologyData,
                PresentationStep::AssayData,
            ],
            DrillholeStyle {
                radius: 5.0,
                policy: ColourPolicy::new(GradeScale::new(0.0, 1.0)),
            },
        )
    }

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(1)),
        }
    }

    fn call(
        engine: Option<&PresentationEngine>,
        request: &RpcRequest,
    ) -> (Option<RpcResponse>, Vec<PresentationAction>) {
        let progress = LoadingProgress::default();
        let context = RpcContext {
            engine,
            loading_progress: &progress,
        };
        let mut actions = Vec::new();
        let response = handle_rpc_request(request, &context, &mut |action| actions.push(action));
        (response, actions)
    }

    #[test]
    fn test_next_step_dispatches_command() {
        let engine = engine();
        let (response, actions) = call(Some(&engine), &request("next_step", serde_json::Value::Null));
        assert_eq!(actions, vec![PresentationAction::Next]);
        assert!(response.unwrap().error.is_none());
    }

    #[test]
    fn test_set_color_mode_parses_mode() {
        let engine = engine();
        let (_, actions) = call(
            Some(&engine),
            &request("set_color_mode", serde_json::json!({"mode": "assay"})),
        );
        assert_eq!(
            actions,
            vec![PresentationAction::SetColourMode(ColourMode::Assay)]
        );

        let (response, actions) = call(
            Some(&engine),
            &request("set_color_mode", serde_json::json!({"mode": "rainbow"})),
        );
        assert!(actions.is_empty());
        assert_eq!(response.unwrap().error.unwrap().code, -32602);
    }

    #[test]
    fn test_go_to_step_rejects_out_of_range() {
        let engine = engine();
        let (response, actions) = call(
            Some(&engine),
            &request("go_to_step", serde_json::json!({"index": 7})),
        );
        assert!(actions.is_empty());
        assert_eq!(response.unwrap().error.unwrap().code, -32602);
    }

    #[test]
    fn test_requests_before_catalog_are_not_ready() {
        let (response, actions) = call(None, &request("next_step", serde_json::Value::Null));
        assert!(actions.is_empty());
        assert_eq!(response.unwrap().error.unwrap().code, -32002);
    }

    #[test]
    fn test_unknown_method() {
        let engine = engine();
        let (response, _) = call(Some(&engine), &request("get_fps", serde_json::Value::Null));
        assert_eq!(response.unwrap().error.unwrap().code, -32601);
    }

    #[test]
    fn test_notifications_get_no_response() {
        let engine = engine();
        let mut notification = request("previous_step", serde_json::Value::Null);
        notification.id = None;
        let (response, actions) = call(Some(&engine), &notification);
        assert!(response.is_none());
        assert_eq!(actions, vec![PresentationAction::Previous]);
    }

    #[test]
    fn test_presentation_state_reports_steps() {
        let engine = engine();
        let (response, _) = call(
            Some(&engine),
            &request("get_presentation_state", serde_json::Value::Null),
        );
        let state = response.unwrap().result.unwrap();
        assert_eq!(state["stepIndex"], 0);
        assert_eq!(state["steps"].as_array().map(Vec::len), Some(3));
        assert_eq!(state["title"], PresentationStep::Satellite.title());
    }

    #[test]
    fn test_presentation_state_reports_unavailable_steps() {
        let mut engine = engine();
        engine.asset_failed(AssetLayer::Satellite);
        let (response, _) = call(
            Some(&engine),
            &request("get_presentation_state", serde_json::Value::Null),
        );
        let state = response.unwrap().result.unwrap();
        assert_eq!(state["unavailable"], true);
        assert_eq!(state["unavailableSteps"], serde_json::json!(["satellite"]));
        assert_eq!(state["visibleLayer"], serde_json::Value::Null);
    }
}
