//! Billboards and render collectors.
//!
//! A billboard is the camera-facing quad a particle is drawn with. The
//! simulation core does not draw; it publishes *visual handles* to a
//! collector, and the external renderer resolves each live handle to its
//! billboard record when building draw lists.
//!
//! Two independent collectors exist per world: one for world-owned effects
//! and one for character-owned effects, selected by a boolean flag at the
//! registration site.

use cgmath::{InnerSpace, Vector3, Vector4};

/// The visual state of one particle: a camera-facing quad.
#[derive(Debug, Clone, Copy)]
pub struct Billboard {
    /// Quad center in world space.
    pub position: Vector3<f32>,
    /// Quad edge length in world units.
    pub size: f32,
    /// Roll angle of the quad around the view axis, in degrees.
    pub angle: f32,
    /// RGBA color.
    pub color: Vector4<f32>,
}

impl Billboard {
    /// A unit white billboard at the origin.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            size: 1.0,
            angle: 0.0,
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl Default for Billboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable identity of one particle's visual: the owning system and its pool
/// slot.
///
/// Handles are stable for the lifetime of a registration: a slot's handle is
/// registered when the particle is emitted and unregistered exactly once when
/// it is retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle {
    /// Id of the owning particle system.
    pub system: u32,
    /// Pool slot index within that system.
    pub slot: u32,
}

/// The interface particle systems publish their visuals through.
pub trait RenderCollector {
    /// Registers a newly emitted particle's visual.
    fn register_visual(&mut self, handle: VisualHandle);
    /// Removes a retired particle's visual.
    fn unregister_visual(&mut self, handle: VisualHandle);
}

/// A capacity-bounded registry of live visual handles.
///
/// Handles keep registration order until [`BillboardList::sort_back_to_front`]
/// reorders them for blended drawing.
pub struct BillboardList {
    handles: Vec<VisualHandle>,
    capacity: usize,
}

impl BillboardList {
    /// Creates an empty list that holds at most `capacity` handles.
    pub fn new(capacity: usize) -> Self {
        Self {
            handles: Vec::new(),
            capacity,
        }
    }

    /// The live handles, in current order.
    pub fn handles(&self) -> &[VisualHandle] {
        &self.handles
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no handles are registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Reorders handles by descending distance from `camera` so that an
    /// alpha-blended renderer can draw them back to front.
    ///
    /// # Arguments
    /// * `camera` - The viewpoint to measure from
    /// * `resolve` - Maps a handle to its current billboard; handles that no
    ///   longer resolve sort last
    pub fn sort_back_to_front<F>(&mut self, camera: Vector3<f32>, resolve: F)
    where
        F: Fn(VisualHandle) -> Option<Billboard>,
    {
        let distance = |handle: &VisualHandle| -> f32 {
            resolve(*handle)
                .map(|b| (b.position - camera).magnitude2())
                .unwrap_or(-1.0)
        };
        self.handles
            .sort_by(|a, b| distance(b).total_cmp(&distance(a)));
    }
}

impl RenderCollector for BillboardList {
    fn register_visual(&mut self, handle: VisualHandle) {
        if self.handles.len() >= self.capacity {
            log::warn!(
                "billboard list full ({} handles), dropping registration",
                self.capacity
            );
            return;
        }
        self.handles.push(handle);
    }

    fn unregister_visual(&mut self, handle: VisualHandle) {
        self.handles.retain(|h| *h != handle);
    }
}

/// The pair of collectors a world owns: world effects and character effects.
pub struct BillboardCollectors {
    /// Collector for world-owned particle systems.
    pub world: BillboardList,
    /// Collector for character-owned particle systems.
    pub character: BillboardList,
}

impl BillboardCollectors {
    /// Creates both collectors with the same capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            world: BillboardList::new(capacity),
            character: BillboardList::new(capacity),
        }
    }

    /// Selects a collector by the character-owned flag.
    pub fn select_mut(&mut self, character_owned: bool) -> &mut BillboardList {
        if character_owned {
            &mut self.character
        } else {
            &mut self.world
        }
    }
}
