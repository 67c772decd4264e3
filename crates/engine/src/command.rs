//! JSON command protocol for driving the engine headlessly (agents, scripts,
//! and the CLI binary).

use serde::{Deserialize, Serialize};
use shared::{BoundaryPoint, FenceColors, FenceStyleKind, Point3};

use crate::harness::TestHarness;
use crate::state::scene::DragOutcome;

/// A command that can be executed against the headless harness.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Build a fence along a polyline
    DrawFence {
        points: Vec<Point3>,
        #[serde(default)]
        style: Option<FenceStyleKind>,
        #[serde(default)]
        colors: Option<FenceColors>,
    },
    /// Build a floor from a mixed straight/curved boundary
    DrawFloor {
        points: Vec<BoundaryPoint>,
    },
    /// Build a rectangle floor between two corners
    RectFloor {
        from: Point3,
        to: Point3,
    },
    /// Create an image-backed floor plane
    ImageFloor {
        name: String,
        width: f64,
        height: f64,
        #[serde(default)]
        payload: Option<String>,
    },
    /// Load a catalog model and place it
    PlaceModel {
        name: String,
        #[serde(default)]
        reference: String,
        price: f64,
        url: String,
        at: Point3,
    },
    /// Register an imported payload in the asset cache and place it
    ImportModel {
        filename: String,
        payload: String,
        #[serde(default)]
        reference: String,
        #[serde(default)]
        price: f64,
        at: Point3,
    },
    /// Select an entity by id
    Select {
        id: String,
    },
    ClearSelection,
    /// Drag an entity by a delta; reverts if the placement collides
    Move {
        id: String,
        delta: [f64; 3],
    },
    Delete {
        id: String,
    },
    Clone {
        id: String,
    },
    SetLocked {
        id: String,
        locked: bool,
    },
    SetCollides {
        id: String,
        collides: bool,
    },
    /// Advisory collision test for an entity
    CheckCollision {
        id: String,
    },
    /// Undo the last committed mutation.
    Undo,
    /// Redo the last undone mutation.
    Redo,
    /// Reset the scene.
    Clear,
    /// Inspect the scene: entity list and totals.
    Inspect,
    /// Export the project payload as JSON.
    ExportProject,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::DrawFence {
            points,
            style,
            colors,
        } => {
            let style = style.unwrap_or(harness.state.fence_config.style);
            match harness.state.scene.create_fence(points, style, colors) {
                Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
                None => CommandResponse::err("fence needs at least 2 points"),
            }
        }

        AgentCommand::DrawFloor { points } => {
            let rate = harness.state.settings.floor_rate;
            match harness.state.scene.create_boundary_floor(points, rate) {
                Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
                None => CommandResponse::err("floor boundary needs at least 3 points"),
            }
        }

        AgentCommand::RectFloor { from, to } => {
            let rate = harness.state.settings.floor_rate;
            match harness.state.scene.create_rect_floor(from, to, rate) {
                Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
                None => CommandResponse::err("rectangle too small"),
            }
        }

        AgentCommand::ImageFloor {
            name,
            width,
            height,
            payload,
        } => {
            let id = harness
                .state
                .scene
                .create_image_floor(&name, width, height, payload);
            CommandResponse::ok_with_data(serde_json::json!({ "id": id }))
        }

        AgentCommand::PlaceModel {
            name,
            reference,
            price,
            url,
            at,
        } => match harness.place_from_url(&name, &reference, price, &url, at) {
            Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::ImportModel {
            filename,
            payload,
            reference,
            price,
            at,
        } => match harness.import_and_place(&filename, payload, &reference, price, at) {
            Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            Err(e) => CommandResponse::err(e),
        },

        AgentCommand::Select { id } => {
            if harness.state.select(&id) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("no entity {id}"))
            }
        }

        AgentCommand::ClearSelection => {
            harness.state.deselect();
            CommandResponse::ok()
        }

        AgentCommand::Move { id, delta } => {
            if !harness.state.scene.begin_drag(&id) {
                return CommandResponse::err(format!("entity {id} is missing or locked"));
            }
            harness.state.scene.translate(&id, delta[0], delta[1], delta[2]);
            let outcome = harness.state.scene.end_drag();
            CommandResponse::ok_with_data(serde_json::json!({
                "reverted": outcome == DragOutcome::Reverted,
            }))
        }

        AgentCommand::Delete { id } => {
            if harness.state.scene.delete(&id) {
                CommandResponse::ok()
            } else {
                CommandResponse::err(format!("entity {id} is missing or locked"))
            }
        }

        AgentCommand::Clone { id } => match harness.state.scene.clone_entity(&id) {
            Some(clone_id) => CommandResponse::ok_with_data(serde_json::json!({ "id": clone_id })),
            None => CommandResponse::err(format!("entity {id} is missing or not cloneable")),
        },

        AgentCommand::SetLocked { id, locked } => {
            let current = match harness.state.scene.get(&id) {
                Some(e) => e.info().locked,
                None => return CommandResponse::err(format!("no entity {id}")),
            };
            if current != locked {
                harness.state.scene.toggle_locked(&id);
            }
            CommandResponse::ok()
        }

        AgentCommand::SetCollides { id, collides } => {
            let current = match harness.state.scene.get(&id) {
                Some(e) => e.info().collides,
                None => return CommandResponse::err(format!("no entity {id}")),
            };
            if current != collides {
                harness.state.scene.toggle_collides(&id);
            }
            CommandResponse::ok()
        }

        AgentCommand::CheckCollision { id } => {
            let hit = crate::collision::check_collision(&harness.state.scene, &id);
            CommandResponse::ok_with_data(serde_json::json!({ "colliding": hit }))
        }

        AgentCommand::Undo => {
            let could = harness.state.scene.can_undo();
            harness.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": could }))
        }

        AgentCommand::Redo => {
            let could = harness.state.scene.can_redo();
            harness.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": could }))
        }

        AgentCommand::Clear => {
            harness.state.reset();
            CommandResponse::ok()
        }

        AgentCommand::Inspect => {
            let entities: Vec<serde_json::Value> = harness
                .state
                .scene
                .entities()
                .iter()
                .map(|entity| {
                    serde_json::json!({
                        "id": entity.id,
                        "name": entity.info().name,
                        "reference": entity.info().reference,
                        "price": entity.price(),
                        "locked": entity.info().locked,
                        "collides": entity.info().collides,
                        "position": entity.transform.position,
                    })
                })
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "entity_count": entities.len(),
                "total_price": harness.state.scene.total_price(),
                "entities": entities,
            }))
        }

        AgentCommand::ExportProject => {
            let json = harness.state.scene.save_project_json();
            CommandResponse::ok_with_data(serde_json::json!({ "project_json": json }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
