//! Editor: the application state tying the engines together.
//!
//! Owns the scene, the draw and placement engines, the selection, and the
//! active render backend. Exactly one gesture is in flight at any time:
//! entering one engine exits the other, and every failure path lands back
//! in an idle state with the scene unchanged.

use crate::export;
use crate::import::{self, ImportError};
use crate::input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::place::{self, PlacementEngine};
use crate::render::{DrawOp, RenderBackend};
use crate::scene::Scene;
use crate::selection::{
    self, Corner, HANDLE_HIT_TOLERANCE, HandleKind, Selection, group_handles,
};
use crate::shapes::{Group, Shape};
use crate::snap::SnapSettings;
use crate::tools::{DrawEngine, Tool};
use kurbo::{Affine, Point, Size};
use std::path::Path;

/// Keyboard nudge distance, in canvas units.
pub const NUDGE_STEP: f64 = 1.0;
/// Keyboard nudge distance with the modifier held.
pub const NUDGE_STEP_FAST: f64 = 10.0;
/// Keyboard rotation step, in degrees.
pub const ROTATE_STEP: f64 = 5.0;
/// Keyboard rotation step with the modifier held.
pub const ROTATE_STEP_FAST: f64 = 15.0;
/// Hit tolerance for picking shapes in select mode.
const PICK_TOLERANCE: f64 = 5.0;

/// How imported geometry is positioned before it becomes permanent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementStyle {
    /// A sizing drag positions and scales the import.
    #[default]
    DragToSize,
    /// The import appears as a live, handle-manipulable object.
    LiveObject,
}

/// Drag in progress on the live placement object.
#[derive(Debug, Clone, Copy)]
enum LiveDrag {
    Move { start: Point, origin: Point },
    Scale { corner: Corner, last: Point },
    Rotate { last: Point },
}

/// The live object of an in-progress retained placement.
#[derive(Debug, Clone)]
struct LivePlacement {
    group: Group,
    drag: Option<LiveDrag>,
}

/// Drag in progress moving the selection.
#[derive(Debug, Clone, Copy)]
struct MoveDrag {
    start: Point,
    origin: Point,
}

/// Application state for one drawing surface.
pub struct Editor {
    /// Committed shapes.
    pub scene: Scene,
    /// Drag-to-draw state machine.
    pub draw: DrawEngine,
    /// Drag-to-place state machine.
    pub placement: PlacementEngine,
    /// Currently selected shapes.
    pub selection: Selection,
    /// Grid snapping configuration.
    pub snap: SnapSettings,
    /// Raw input tracking.
    pub input: InputState,
    canvas_size: Size,
    placement_style: PlacementStyle,
    live: Option<LivePlacement>,
    move_drag: Option<MoveDrag>,
    backend: Box<dyn RenderBackend>,
    last_frame: Vec<DrawOp>,
}

impl Editor {
    /// Create an editor over the given render backend.
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            scene: Scene::new(),
            draw: DrawEngine::new(),
            placement: PlacementEngine::new(),
            selection: Selection::new(),
            snap: SnapSettings::default(),
            input: InputState::new(),
            canvas_size: Size::new(800.0, 600.0),
            placement_style: PlacementStyle::default(),
            live: None,
            move_drag: None,
            backend,
            last_frame: Vec::new(),
        }
    }

    /// Create an editor that places imports as live objects.
    pub fn with_placement_style(backend: Box<dyn RenderBackend>, style: PlacementStyle) -> Self {
        let mut editor = Self::new(backend);
        editor.placement_style = style;
        editor
    }

    /// Current canvas size.
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// The draw commands of the most recent frame.
    pub fn last_frame(&self) -> &[DrawOp] {
        &self.last_frame
    }

    /// Resize the drawing surface. Committed shapes keep their
    /// coordinates; the scene is simply re-rendered at the new size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas_size = Size::new(width, height);
        self.rerender();
    }

    /// Switch tools, settling any placement in progress first.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != Tool::Select {
            self.finalize_live();
            self.selection.clear();
        }
        if self.placement.is_active() {
            self.placement.cancel();
        }
        self.draw.set_tool(tool);
        self.rerender();
    }

    /// Update modifier keys state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.input.set_modifiers(modifiers);
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        self.input.handle_pointer_event(event);
        match *event {
            PointerEvent::Down { position, button } if button == MouseButton::Left => {
                self.pointer_down(position);
            }
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } if button == MouseButton::Left => {
                self.pointer_up(position);
            }
            _ => {}
        }
    }

    /// Process a key event.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        self.input.handle_key_event(event);
        if let KeyEvent::Pressed(key) = event {
            self.key_pressed(key);
        }
    }

    fn pointer_down(&mut self, pos: Point) {
        if self.live.is_some() {
            self.live_pointer_down(pos);
            return;
        }
        if self.placement.is_active() {
            self.placement.on_pointer_down(pos);
            self.rerender();
            return;
        }
        match self.draw.tool {
            Tool::Select => self.select_pointer_down(pos),
            _ => {
                let snapped = self.snap.snap_point(pos);
                self.draw.begin(snapped);
                self.rerender();
            }
        }
    }

    fn pointer_move(&mut self, pos: Point) {
        if self.live.is_some() {
            self.live_pointer_move(pos);
            return;
        }
        if self.placement.is_dragging() {
            self.rerender();
            return;
        }
        if self.draw.is_active() {
            let snapped = self.snap.snap_point(pos);
            self.draw.update(snapped);
            self.rerender();
            return;
        }
        if let Some(drag) = self.move_drag {
            self.translate_selection_to(drag, pos);
        }
    }

    fn pointer_up(&mut self, pos: Point) {
        if let Some(live) = &mut self.live {
            live.drag = None;
            return;
        }
        if self.placement.is_dragging() {
            if let Some(baked) = self.placement.on_pointer_up(pos) {
                log::info!("placed {} imported shapes", baked.len());
                for shape in baked {
                    self.backend.add(&shape);
                    self.scene.add_shape(shape);
                }
            }
            self.rerender();
            return;
        }
        if self.draw.is_active() {
            let snapped = self.snap.snap_point(pos);
            if let Some(shape) = self.draw.end(snapped) {
                self.backend.add(&shape);
                self.scene.add_shape(shape);
            }
            self.rerender();
        }
        self.move_drag = None;
    }

    fn select_pointer_down(&mut self, pos: Point) {
        let hits = self.scene.shapes_at_point(pos, PICK_TOLERANCE);
        match hits.first() {
            Some(&id) => {
                if self.input.modifiers.shift {
                    self.selection.add(id);
                } else if !self.selection.contains(id) {
                    self.selection.select(id);
                }
                if let Some(origin) = self.selection_origin() {
                    self.move_drag = Some(MoveDrag { start: pos, origin });
                }
            }
            None => self.selection.clear(),
        }
        self.rerender();
    }

    fn selection_origin(&self) -> Option<Point> {
        let mut bounds: Option<kurbo::Rect> = None;
        for &id in self.selection.ids() {
            let shape = self.scene.get_shape(id)?;
            let b = shape.bounds();
            bounds = Some(match bounds {
                Some(acc) => acc.union(b),
                None => b,
            });
        }
        bounds.map(|b| Point::new(b.x0, b.y0))
    }

    /// Move the selection so its bounding-box origin tracks the drag,
    /// snapped to the grid. Tracking is absolute against the drag start so
    /// snapping never swallows small movements.
    fn translate_selection_to(&mut self, drag: MoveDrag, pos: Point) {
        let Some(current_origin) = self.selection_origin() else {
            return;
        };
        let target = drag.origin + (pos - drag.start);
        let snapped = self.snap.snap_point(target);
        let delta = snapped - current_origin;
        if delta.hypot2() == 0.0 {
            return;
        }
        let affine = Affine::translate(delta);
        for id in self.selection.ids().to_vec() {
            if let Some(shape) = self.scene.get_shape_mut(id) {
                shape.transform(affine);
                let updated = shape.clone();
                self.backend.update(&updated);
            }
        }
        self.rerender();
    }

    fn key_pressed(&mut self, key: &str) {
        let shift = self.input.modifiers.shift;
        let step = if shift { NUDGE_STEP_FAST } else { NUDGE_STEP };
        match key {
            "Delete" | "Backspace" => {
                if self.live.is_some() {
                    self.cancel_live();
                } else {
                    self.delete_selection();
                }
            }
            "Escape" => {
                self.draw.cancel();
                self.cancel_live();
                if self.placement.is_active() {
                    self.placement.cancel();
                    log::info!("placement cancelled");
                }
                self.rerender();
            }
            "Enter" => self.confirm_placement(),
            "ArrowLeft" => self.nudge(-step, 0.0),
            "ArrowRight" => self.nudge(step, 0.0),
            "ArrowUp" => self.nudge(0.0, -step),
            "ArrowDown" => self.nudge(0.0, step),
            "r" | "R" => {
                let amount = if shift { ROTATE_STEP_FAST } else { ROTATE_STEP };
                let signed = if key == "R" { -amount } else { amount };
                self.rotate_live(signed);
            }
            _ => {}
        }
    }

    fn nudge(&mut self, dx: f64, dy: f64) {
        if let Some(live) = &mut self.live {
            live.group.transform(Affine::translate((dx, dy)));
            self.rerender();
        } else if self.placement.is_active() {
            self.placement.nudge(dx, dy);
            self.rerender();
        }
    }

    fn confirm_placement(&mut self) {
        if self.live.is_some() {
            self.finalize_live();
            return;
        }
        if !self.placement.is_active() {
            return;
        }
        let baked = if self.placement.is_dragging() {
            self.placement.on_pointer_up(self.input.pointer_position)
        } else {
            self.placement.commit_default(self.canvas_size)
        };
        if let Some(baked) = baked {
            log::info!("placed {} imported shapes", baked.len());
            for shape in baked {
                self.backend.add(&shape);
                self.scene.add_shape(shape);
            }
        }
        self.rerender();
    }

    /// Delete every selected shape, leaving the rest in z-order.
    pub fn delete_selection(&mut self) {
        for id in self.selection.ids().to_vec() {
            self.scene.remove_shape(id);
            self.backend.remove(id);
        }
        self.selection.clear();
        self.rerender();
    }

    /// Apply a stroke color to the active target: the live placement
    /// object, the selection, or the style for subsequent shapes.
    pub fn set_stroke_color(&mut self, color: &str) {
        if let Some(live) = &mut self.live {
            live.group.set_stroke_color(color);
            self.rerender();
            return;
        }
        if !self.selection.is_empty() {
            for id in self.selection.ids().to_vec() {
                if let Some(shape) = self.scene.get_shape_mut(id) {
                    shape.style_mut().stroke_color = color.to_string();
                    let width = shape.style().stroke_width;
                    self.backend.set_style(id, color, width);
                }
            }
            self.rerender();
        }
        self.draw.current_style.stroke_color = color.to_string();
    }

    /// Apply a stroke width (clamped) to the active target.
    pub fn set_stroke_width(&mut self, width: f64) {
        if let Some(live) = &mut self.live {
            live.group.set_stroke_width(width);
            self.rerender();
            return;
        }
        if !self.selection.is_empty() {
            for id in self.selection.ids().to_vec() {
                if let Some(shape) = self.scene.get_shape_mut(id) {
                    shape.style_mut().set_stroke_width(width);
                    let style = shape.style().clone();
                    self.backend.set_style(id, &style.stroke_color, style.stroke_width);
                }
            }
            self.rerender();
        }
        self.draw.current_style.set_stroke_width(width);
    }

    /// Import a document from text and start a placement session.
    /// On failure the scene is untouched and the error is surfaced for the
    /// host to display.
    pub fn import_text(&mut self, text: &str) -> Result<(), ImportError> {
        let geometry = import::parse(text)?;
        self.start_placement(geometry);
        Ok(())
    }

    /// Import a document from disk and start a placement session.
    pub fn import_path(&mut self, path: impl AsRef<Path>) -> Result<(), ImportError> {
        let geometry = import::load_path(path)?;
        self.start_placement(geometry);
        Ok(())
    }

    fn start_placement(&mut self, geometry: import::ImportedGeometry) {
        // A new import settles whatever was in flight.
        self.finalize_live();
        self.placement.cancel();
        self.draw.cancel();

        if geometry.skipped > 0 {
            log::warn!("import dropped {} unusable elements", geometry.skipped);
        }
        log::info!("imported {} shapes", geometry.shapes.len());

        match self.placement_style {
            PlacementStyle::DragToSize => {
                self.placement.arm(geometry);
            }
            PlacementStyle::LiveObject => {
                self.draw.set_tool(Tool::Select);
                self.selection.clear();
                let group = place::place_as_group(&geometry, self.canvas_size);
                self.live = Some(LivePlacement { group, drag: None });
            }
        }
        self.rerender();
    }

    fn live_pointer_down(&mut self, pos: Point) {
        let Some(live) = &mut self.live else {
            return;
        };
        let bounds = live.group.bounds();
        if let Some(kind) =
            selection::hit_test_handles(&group_handles(bounds), pos, HANDLE_HIT_TOLERANCE)
        {
            live.drag = Some(match kind {
                HandleKind::Corner(corner) => LiveDrag::Scale { corner, last: pos },
                HandleKind::Rotate => LiveDrag::Rotate { last: pos },
            });
            return;
        }
        if live.group.hit_test(pos, PICK_TOLERANCE) {
            live.drag = Some(LiveDrag::Move {
                start: pos,
                origin: Point::new(bounds.x0, bounds.y0),
            });
            return;
        }
        // Clicked outside the object being placed: freeze it in place.
        self.finalize_live();
    }

    fn live_pointer_move(&mut self, pos: Point) {
        let snap = self.snap;
        let Some(live) = &mut self.live else {
            return;
        };
        match live.drag {
            Some(LiveDrag::Move { start, origin }) => {
                let bounds = live.group.bounds();
                let target = origin + (pos - start);
                let snapped = snap.snap_point(target);
                let delta = snapped - Point::new(bounds.x0, bounds.y0);
                live.group.transform(Affine::translate(delta));
            }
            Some(LiveDrag::Scale { corner, last }) => {
                selection::apply_corner_scale(&mut live.group, corner, pos - last);
                live.drag = Some(LiveDrag::Scale { corner, last: pos });
            }
            Some(LiveDrag::Rotate { last }) => {
                let center = live.group.bounds().center();
                let from = (last.y - center.y).atan2(last.x - center.x);
                let to = (pos.y - center.y).atan2(pos.x - center.x);
                selection::apply_rotation(&mut live.group, (to - from).to_degrees());
                live.drag = Some(LiveDrag::Rotate { last: pos });
            }
            None => return,
        }
        self.rerender();
    }

    fn rotate_live(&mut self, degrees: f64) {
        if let Some(live) = &mut self.live {
            selection::apply_rotation(&mut live.group, degrees);
            self.rerender();
        }
    }

    /// Freeze the live placement object: its children become ordinary
    /// scene members, appended in their original order.
    fn finalize_live(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        let children = live.group.ungroup();
        log::info!("placed {} imported shapes", children.len());
        for shape in children {
            self.backend.add(&shape);
            self.scene.add_shape(shape);
        }
        self.rerender();
    }

    fn cancel_live(&mut self) {
        if self.live.take().is_some() {
            log::info!("placement cancelled");
            self.rerender();
        }
    }

    /// Serialize the scene, settling any gesture in progress first.
    pub fn export_svg(&mut self) -> String {
        self.draw.cancel();
        self.finalize_live();
        if self.placement.is_dragging() {
            self.confirm_placement();
        } else if self.placement.is_active() {
            self.placement.cancel();
        }
        self.rerender();
        export::serialize(&self.scene, self.canvas_size.width, self.canvas_size.height)
    }

    /// Export and write to disk.
    pub fn save_path(&mut self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let document = self.export_svg();
        export::write_path(path, &document)
    }

    /// Remove everything, cancelling any placement in progress.
    pub fn clear(&mut self) {
        self.placement.cancel();
        self.live = None;
        self.draw.cancel();
        self.selection.clear();
        self.scene.clear();
        self.backend.clear();
        self.rerender();
    }

    /// Re-render the frame: committed shapes plus the transient overlay
    /// (provisional draw shape, placement preview, or live object).
    fn rerender(&mut self) {
        let overlay: Vec<Shape> = if let Some(live) = &self.live {
            live.group.children().to_vec()
        } else if self.draw.is_active() {
            self.draw.preview_shape().into_iter().collect()
        } else if self.placement.is_dragging() {
            self.placement
                .preview(self.input.pointer_position)
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        self.backend.set_overlay(&overlay);
        self.last_frame = self.backend.present();
    }
}
