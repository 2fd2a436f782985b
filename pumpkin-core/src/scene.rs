//! Decoration scene: the ordered sticker list, the selection and drag clamping.

use serde::{Deserialize, Serialize};

use crate::{
    Decoration, DecorationId, DecorationKind, DecorError, DecorResult, DragState, PlacedGlyph,
    Position,
};

/// Bounding box of the decoration zone in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Client x of the zone's left edge.
    pub left: f32,
    /// Client y of the zone's top edge.
    pub top: f32,
    /// Zone width in pixels.
    pub width: f32,
    /// Zone height in pixels.
    pub height: f32,
}

impl Zone {
    /// A zone of the given size anchored at the client origin.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Move the zone's top-left corner.
    #[must_use]
    pub const fn with_origin(mut self, left: f32, top: f32) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Convert a client point to zone-local coordinates.
    #[must_use]
    pub fn to_local(&self, client_x: f32, client_y: f32) -> Position {
        Position::new(client_x - self.left, client_y - self.top)
    }

    /// The zone center in zone-local coordinates.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a position so an element of size `footprint` stays inside the zone.
    ///
    /// A zone smaller than the footprint pins the axis to 0.
    #[must_use]
    pub fn clamp(&self, position: Position, footprint: f32) -> Position {
        Position::new(
            position.x.min(self.width - footprint).max(0.0),
            position.y.min(self.height - footprint).max(0.0),
        )
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::new(400.0, 450.0)
    }
}

/// The placed decorations, kept in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SceneData")]
pub struct Scene {
    /// Decorations in insertion (paint) order.
    decorations: Vec<Decoration>,
    /// Currently selected decoration.
    selected: Option<DecorationId>,
    /// Next id to hand out.
    next_id: u64,
    /// Decoration zone bounds.
    pub zone: Zone,
    /// Assumed decoration size for clamping.
    pub footprint: f32,
}

/// Unchecked wire form of [`Scene`].
#[derive(Deserialize)]
struct SceneData {
    decorations: Vec<Decoration>,
    selected: Option<DecorationId>,
    next_id: u64,
    zone: Zone,
    footprint: f32,
}

impl TryFrom<SceneData> for Scene {
    type Error = DecorError;

    /// Ids must be unique and at most one decoration may be flagged selected.
    /// The selection pointer follows the flags and `next_id` moves past every id.
    fn try_from(data: SceneData) -> DecorResult<Self> {
        let mut seen = std::collections::HashSet::with_capacity(data.decorations.len());
        if let Some(dup) = data.decorations.iter().find(|d| !seen.insert(d.id)) {
            return Err(DecorError::InvalidScene(format!("duplicate id {}", dup.id)));
        }

        let mut flagged = data.decorations.iter().filter(|d| d.selected).map(|d| d.id);
        let selected = flagged.next();
        if flagged.next().is_some() {
            return Err(DecorError::InvalidScene(
                "more than one decoration is selected".to_string(),
            ));
        }
        if data.selected != selected {
            tracing::debug!(
                pointer = ?data.selected,
                flagged = ?selected,
                "selection pointer disagrees with flags, using flags"
            );
        }

        let after_max = data
            .decorations
            .iter()
            .map(|d| d.id.get().saturating_add(1))
            .max()
            .unwrap_or(1);
        Ok(Self {
            decorations: data.decorations,
            selected,
            next_id: data.next_id.max(after_max),
            zone: data.zone,
            footprint: data.footprint,
        })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Zone::default(), 40.0)
    }
}

impl Scene {
    /// Create an empty scene over the given zone.
    #[must_use]
    pub fn new(zone: Zone, footprint: f32) -> Self {
        Self {
            decorations: Vec::new(),
            selected: None,
            next_id: 1,
            zone,
            footprint,
        }
    }

    /// Append a decoration at a zone-local position. No clamping is applied.
    pub fn add(&mut self, kind: DecorationKind, position: Position) -> DecorationId {
        let id = DecorationId::from_raw(self.next_id);
        self.next_id += 1;
        self.decorations.push(Decoration::new(id, kind, position));
        id
    }

    /// Remove a decoration, clearing the selection if it pointed at it.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoration is not found.
    pub fn remove(&mut self, id: DecorationId) -> DecorResult<Decoration> {
        let index = self
            .index_of(id)
            .ok_or(DecorError::DecorationNotFound(id))?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(self.decorations.remove(index))
    }

    /// Remove every decoration and clear the selection.
    pub fn clear(&mut self) -> usize {
        let removed = self.decorations.len();
        self.decorations.clear();
        self.selected = None;
        removed
    }

    /// Get a decoration by ID.
    #[must_use]
    pub fn get(&self, id: DecorationId) -> Option<&Decoration> {
        self.decorations.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: DecorationId) -> Option<&mut Decoration> {
        self.decorations.iter_mut().find(|d| d.id == id)
    }

    fn index_of(&self, id: DecorationId) -> Option<usize> {
        self.decorations.iter().position(|d| d.id == id)
    }

    /// All decorations in insertion order.
    pub fn decorations(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    /// Number of decorations in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Select a decoration, clearing the previous selection first.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoration is not found.
    pub fn select(&mut self, id: DecorationId) -> DecorResult<()> {
        if self.get(id).is_none() {
            return Err(DecorError::DecorationNotFound(id));
        }
        self.deselect();
        if let Some(decoration) = self.get_mut(id) {
            decoration.selected = true;
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Clear the selection, if any.
    pub fn deselect(&mut self) -> Option<DecorationId> {
        let previous = self.selected.take()?;
        if let Some(decoration) = self.get_mut(previous) {
            decoration.selected = false;
        }
        Some(previous)
    }

    /// The selected decoration's id.
    #[must_use]
    pub fn selected(&self) -> Option<DecorationId> {
        self.selected
    }

    /// Start dragging a decoration from the given client pointer position.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoration is not found.
    pub fn begin_drag(&mut self, id: DecorationId, client_x: f32, client_y: f32) -> DecorResult<()> {
        let pointer = self.zone.to_local(client_x, client_y);
        let decoration = self
            .get_mut(id)
            .ok_or(DecorError::DecorationNotFound(id))?;
        decoration.drag = DragState::Dragging {
            grab_dx: pointer.x - decoration.position.x,
            grab_dy: pointer.y - decoration.position.y,
        };
        Ok(())
    }

    /// Move every dragging decoration after the pointer. Returns how many moved.
    pub fn drag_to(&mut self, client_x: f32, client_y: f32) -> usize {
        let pointer = self.zone.to_local(client_x, client_y);
        let zone = self.zone;
        let footprint = self.footprint;
        let mut moved = 0;
        for decoration in &mut self.decorations {
            if let DragState::Dragging { grab_dx, grab_dy } = decoration.drag {
                let target = Position::new(pointer.x - grab_dx, pointer.y - grab_dy);
                decoration.position = zone.clamp(target, footprint);
                moved += 1;
            }
        }
        moved
    }

    /// Release every dragging decoration where it is.
    pub fn end_drag(&mut self) -> usize {
        let mut released = 0;
        for decoration in &mut self.decorations {
            if decoration.is_dragging() {
                decoration.drag = DragState::Idle;
                released += 1;
            }
        }
        released
    }

    /// Set a decoration's position, clamped to the zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoration is not found.
    pub fn move_to(&mut self, id: DecorationId, position: Position) -> DecorResult<Position> {
        let clamped = self.zone.clamp(position, self.footprint);
        let decoration = self
            .get_mut(id)
            .ok_or(DecorError::DecorationNotFound(id))?;
        decoration.position = clamped;
        Ok(clamped)
    }

    /// Map every decoration into an output image of the given size.
    ///
    /// Each axis is scaled by `output / zone`. Glyphs come out in insertion order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn export_layout(&self, output_width: u32, output_height: u32) -> Vec<PlacedGlyph> {
        let sx = axis_scale(output_width as f32, self.zone.width);
        let sy = axis_scale(output_height as f32, self.zone.height);
        self.decorations
            .iter()
            .map(|d| PlacedGlyph {
                glyph: d.glyph().to_string(),
                x: d.position.x * sx,
                y: d.position.y * sy,
            })
            .collect()
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DecorResult<String> {
        serde_json::to_string(self).map_err(DecorError::Serialization)
    }

    /// Deserialize a scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the scene has duplicate
    /// ids or more than one selected decoration.
    pub fn from_json(json: &str) -> DecorResult<Self> {
        serde_json::from_str(json).map_err(DecorError::Serialization)
    }
}

fn axis_scale(output: f32, zone: f32) -> f32 {
    if zone > 0.0 {
        output / zone
    } else {
        0.0
    }
}
