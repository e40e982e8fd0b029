//! JSON replay scripts for driving an editor without a host.

use crate::editor::Editor;
use crate::error::{EditorError, EditorResult};
use easel_core::{BrushStyle, KeyEvent, Modifiers, PointerEvent, SerializableColor, ToolKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ScriptStep {
    Tool { tool: ToolKind },
    Brush { style: BrushStyle },
    /// Hex color, `#rrggbb` or `#rrggbbaa`.
    Color { color: String },
    Size { size: f64 },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Leave,
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Text { text: String },
    Undo,
    Redo,
    /// Initial image, relative to the script's directory.
    Load { path: PathBuf },
}

pub fn parse_script(json: &str) -> EditorResult<Vec<ScriptStep>> {
    serde_json::from_str(json).map_err(|e| EditorError::Script(e.to_string()))
}

/// Apply `steps` in order, stopping at the first error.
pub async fn replay(editor: &mut Editor, steps: &[ScriptStep], base_dir: &Path) -> EditorResult<()> {
    for (index, step) in steps.iter().enumerate() {
        log::debug!("Step {index}: {step:?}");
        apply(editor, step, base_dir).await?;
    }
    log::info!("Replayed {} steps", steps.len());
    Ok(())
}

async fn apply(editor: &mut Editor, step: &ScriptStep, base_dir: &Path) -> EditorResult<()> {
    match step {
        ScriptStep::Tool { tool } => editor.set_tool(*tool)?,
        ScriptStep::Brush { style } => editor.set_brush_style(*style),
        ScriptStep::Color { color } => {
            let parsed = SerializableColor::from_hex(color)
                .ok_or_else(|| EditorError::Script(format!("bad color {color:?}")))?;
            editor.set_color(parsed);
        }
        ScriptStep::Size { size } => editor.set_brush_size(*size),
        ScriptStep::Down { x, y } => editor.pointer(PointerEvent::Down {
            position: Point::new(*x, *y),
        })?,
        ScriptStep::Move { x, y } => editor.pointer(PointerEvent::Move {
            position: Point::new(*x, *y),
        })?,
        ScriptStep::Up { x, y } => editor.pointer(PointerEvent::Up {
            position: Point::new(*x, *y),
        })?,
        ScriptStep::Leave => editor.pointer(PointerEvent::Leave)?,
        ScriptStep::Key { key, modifiers } => {
            editor
                .key(KeyEvent::new(key.as_str()).with_modifiers(*modifiers))
                .await?
        }
        ScriptStep::Text { text } => editor.submit_text(text)?,
        ScriptStep::Undo => {
            editor.undo().await?;
        }
        ScriptStep::Redo => {
            editor.redo().await?;
        }
        ScriptStep::Load { path } => {
            let bytes = std::fs::read(base_dir.join(path))?;
            editor.load_initial_image(&bytes).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use easel_core::ShapeKind;

    #[test]
    fn test_parse_script() {
        let steps = parse_script(
            r##"[
                {"op": "tool", "tool": {"shape": "hexagon"}},
                {"op": "color", "color": "#3366ff"},
                {"op": "down", "x": 1, "y": 2},
                {"op": "leave"},
                {"op": "key", "key": "z", "modifiers": {"ctrl": true}}
            ]"##,
        )
        .unwrap();
        assert_eq!(steps[0], ScriptStep::Tool { tool: ToolKind::Shape(ShapeKind::Hexagon) });
        assert_eq!(steps[2], ScriptStep::Down { x: 1.0, y: 2.0 });
        assert_eq!(steps[3], ScriptStep::Leave);
        assert!(matches!(&steps[4], ScriptStep::Key { modifiers, .. } if modifiers.ctrl));
        assert!(matches!(parse_script(r#"[{"op": "fly"}]"#), Err(EditorError::Script(_))));
    }

    #[test]
    fn test_replay_draws_and_undoes() {
        let mut editor = Editor::new(&EditorConfig {
            width: 64,
            height: 64,
            ..EditorConfig::default()
        })
        .unwrap();
        let steps = parse_script(
            r#"[
                {"op": "tool", "tool": {"shape": "rectangle"}},
                {"op": "down", "x": 10, "y": 10},
                {"op": "up", "x": 30, "y": 30},
                {"op": "tool", "tool": "brush"},
                {"op": "down", "x": 5, "y": 50},
                {"op": "move", "x": 60, "y": 50},
                {"op": "up", "x": 60, "y": 50},
                {"op": "undo"}
            ]"#,
        )
        .unwrap();
        pollster::block_on(replay(&mut editor, &steps, Path::new("."))).unwrap();
        assert_eq!(editor.shapes().len(), 1);
        assert!(editor.can_redo());
    }

    #[test]
    fn test_replay_bad_color() {
        let mut editor = Editor::new(&EditorConfig::default()).unwrap();
        let steps = vec![ScriptStep::Color { color: "teal".into() }];
        assert!(matches!(
            pollster::block_on(replay(&mut editor, &steps, Path::new("."))),
            Err(EditorError::Script(_))
        ));
    }
}
