//! Tests for the MCP adapter.

use rmcp::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::{Value, json};
use strictly_puzzles::{
    EnvRequest, ExecuteMoveRequest, InitSimulatorRequest, PuzzleServer, SessionRegistry,
};

fn body(result: &CallToolResult) -> Value {
    let text = &result.content[0].as_text().unwrap().text;
    serde_json::from_str(text).unwrap()
}

fn server() -> PuzzleServer {
    PuzzleServer::new(SessionRegistry::default())
}

#[tokio::test]
async fn test_tool_round_trip() {
    let server = server();

    let created = server
        .init_simulator(Parameters(InitSimulatorRequest {
            puzzle_type: "TowerOfHanoi".to_string(),
            n: 2,
            k: None,
            scenario: None,
        }))
        .await
        .unwrap();
    assert_eq!(created.is_error, Some(false));
    let env_id = body(&created)["env_id"].as_str().unwrap().to_string();

    let moved = server
        .execute_move(Parameters(ExecuteMoveRequest {
            env_id: env_id.clone(),
            mov: json!([1, 0, 1]),
        }))
        .await
        .unwrap();
    assert_eq!(moved.is_error, Some(false));
    let moved = body(&moved);
    assert_eq!(moved["move_successful"], json!(true));
    assert_eq!(moved["state"], json!([[2], [1], []]));
    assert_eq!(moved["goal_reached"], json!(false));

    let state = server
        .get_state(Parameters(EnvRequest { env_id }))
        .await
        .unwrap();
    let state = body(&state);
    assert_eq!(state["puzzle_type"], json!("TowerOfHanoi"));
    assert_eq!(state["parameters"]["N"], json!(2));
}

#[tokio::test]
async fn test_errors_are_flagged_results() {
    let server = server();

    let result = server
        .execute_move(Parameters(ExecuteMoveRequest {
            env_id: "missing".to_string(),
            mov: json!([1, 0, 2]),
        }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    let error = body(&result);
    assert_eq!(error["error"], json!("UnknownSession"));
    assert!(error["message"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_illegal_move_is_not_an_error_result() {
    let server = server();
    let created = server
        .init_simulator(Parameters(InitSimulatorRequest {
            puzzle_type: "RiverCrossing".to_string(),
            n: 2,
            k: Some(1),
            scenario: None,
        }))
        .await
        .unwrap();
    let env_id = body(&created)["env_id"].as_str().unwrap().to_string();

    let result = server
        .execute_move(Parameters(ExecuteMoveRequest {
            env_id,
            mov: json!([1, 2]),
        }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(false));
    assert_eq!(body(&result)["move_successful"], json!(false));
}

#[tokio::test]
async fn test_lists_and_deletes() {
    let server = server();
    let created = server
        .init_simulator(Parameters(InitSimulatorRequest {
            puzzle_type: "hanoi".to_string(),
            n: 3,
            k: None,
            scenario: None,
        }))
        .await
        .unwrap();
    let env_id = body(&created)["env_id"].as_str().unwrap().to_string();

    let listed = body(&server.list_simulators().await.unwrap());
    assert_eq!(listed["sessions"].as_array().unwrap().len(), 1);

    let deleted = server
        .delete_simulator(Parameters(EnvRequest {
            env_id: env_id.clone(),
        }))
        .await
        .unwrap();
    assert_eq!(body(&deleted)["deleted"], json!(true));
    assert!(server.tools().registry().is_empty());
}

#[test]
fn test_advertises_tools() {
    let info = server().get_info();
    assert!(info.capabilities.tools.is_some());
    assert!(info.instructions.is_some());
}
