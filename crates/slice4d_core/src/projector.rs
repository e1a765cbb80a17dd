//! Projection of the 4D grid into a 3D render section
//!
//! A section is a cubic window of side `world_size` cut through the grid along
//! the current basis. Each occupied cell of the window becomes a [`Placement`]:
//! a local 3D position, the content to instantiate, and the [`Orientation`] the
//! content must be shown in so its visible face matches the viewing direction.

use std::collections::HashMap;

use bitflags::bitflags;
use slotmap::{new_key_type, SlotMap};

use slice4d_math::{Axis, Basis, IVec4, PivotAxis, Vec4};

use crate::ports::{RenderHandle, SectionId};
use crate::{ContentRegistry, Grid4D};

new_key_type! {
    /// Key to a placement inside a [`RenderSection`]
    pub struct PlacementKey;
}

bitflags! {
    /// Section axes along which non-symmetrical content is mirrored
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MirrorFlags: u8 {
        const RIGHT = 1 << 0;
        const UP = 1 << 1;
        const FORWARD = 1 << 2;
    }
}

/// How a piece of content is oriented inside a section
///
/// Applied as a 90° yaw (around up) when `quarter_turn` is set, then a scale
/// of -1 along every mirrored axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Orientation {
    pub quarter_turn: bool,
    pub mirror: MirrorFlags,
}

impl Orientation {
    /// Unrotated and unmirrored
    pub const IDENTITY: Self = Self {
        quarter_turn: false,
        mirror: MirrorFlags::empty(),
    };

    const fn turned(mirror: MirrorFlags) -> Self {
        Self { quarter_turn: true, mirror }
    }

    /// Orientation of non-symmetrical content under `basis`
    ///
    /// Four sign patterns of (right, forward, fixed) call for a quarter turn
    /// plus a specific mirror. Every other basis falls back to mirroring each
    /// section axis that is walked in the negative grid direction.
    pub fn for_basis(basis: &Basis) -> Self {
        let (r, _, f, x) = basis.axes();

        if (r.z < 0 && f.x > 0 && x.w > 0)
            || (r.z < 0 && f.w > 0 && x.x < 0)
            || (r.w > 0 && f.x > 0 && x.z > 0)
        {
            Self::turned(MirrorFlags::RIGHT | MirrorFlags::FORWARD)
        } else if (r.z < 0 && f.x < 0 && x.w < 0)
            || (r.z < 0 && f.w < 0 && x.x > 0)
            || (r.w < 0 && f.x < 0 && x.z > 0)
        {
            Self::turned(MirrorFlags::FORWARD)
        } else if (r.z > 0 && f.x > 0 && x.w < 0)
            || (r.w < 0 && f.x > 0 && x.z < 0)
            || (r.z > 0 && f.w > 0 && x.x > 0)
        {
            Self::turned(MirrorFlags::RIGHT)
        } else if (r.z > 0 && f.x < 0 && x.w < 0)
            || (r.z > 0 && f.x < 0 && x.w > 0)
            || (r.z > 0 && f.w < 0 && x.x < 0)
            || (r.w > 0 && f.x < 0 && x.z < 0)
        {
            Self::turned(MirrorFlags::empty())
        } else {
            let mut mirror = MirrorFlags::empty();
            mirror.set(MirrorFlags::RIGHT, basis.right().has_negative_component());
            mirror.set(MirrorFlags::UP, basis.up().has_negative_component());
            mirror.set(MirrorFlags::FORWARD, basis.forward().has_negative_component());
            Self { quarter_turn: false, mirror }
        }
    }

    /// Yaw around up, in degrees
    pub fn yaw_degrees(&self) -> f32 {
        if self.quarter_turn { 90.0 } else { 0.0 }
    }

    /// Scale along `[right, up, forward]`
    pub fn scale(&self) -> [f32; 3] {
        let s = |flag: MirrorFlags| if self.mirror.contains(flag) { -1.0 } else { 1.0 };
        [s(MirrorFlags::RIGHT), s(MirrorFlags::UP), s(MirrorFlags::FORWARD)]
    }
}

/// Placement of one grid cell inside a section
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Grid coordinate the placement was cut from
    pub coord: IVec4,
    /// Window index along `[right, up, forward]`
    pub index: [i32; 3],
    /// `index * cell_size`
    pub local_position: [f32; 3],
    pub content: String,
    pub info_text: Option<String>,
    pub orientation: Orientation,
    /// Appears/disappears without animation during a transition
    pub instant: bool,
    /// Set once the renderer instantiated it
    pub handle: Option<RenderHandle>,
    /// Hidden after an interaction (question marks)
    pub hidden: bool,
}

/// Dimensions used to lay a section out in 3D
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionSettings {
    /// Side of one grid cell in scene units
    pub cell_size: f32,
    /// Height of the player's eye above the cell floor
    pub eye_height: f32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            cell_size: 3.0,
            eye_height: 1.0,
        }
    }
}

/// One 3D instantiation of the grid under a basis
#[derive(Debug)]
pub struct RenderSection {
    id: SectionId,
    basis: Basis,
    origin: IVec4,
    world_size: i32,
    settings: ProjectionSettings,
    placements: SlotMap<PlacementKey, Placement>,
    by_coord: HashMap<IVec4, PlacementKey>,
    player_position: Option<[f32; 3]>,
    /// Accumulated renderer-side translation of the whole section
    offset: [f32; 3],
}

impl RenderSection {
    /// A section with no placements, used before the first level is shown
    pub fn empty(id: SectionId, basis: Basis, settings: ProjectionSettings) -> Self {
        Self {
            id,
            basis,
            origin: IVec4::ZERO,
            world_size: 0,
            settings,
            placements: SlotMap::with_key(),
            by_coord: HashMap::new(),
            player_position: None,
            offset: [0.0; 3],
        }
    }

    #[inline]
    pub fn id(&self) -> SectionId {
        self.id
    }

    #[inline]
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Grid coordinate of window index (0, 0, 0)
    #[inline]
    pub fn origin(&self) -> IVec4 {
        self.origin
    }

    #[inline]
    pub fn world_size(&self) -> i32 {
        self.world_size
    }

    /// Local position of the player, if the player's cell is inside the window
    #[inline]
    pub fn player_position(&self) -> Option<[f32; 3]> {
        self.player_position
    }

    #[inline]
    pub fn offset(&self) -> [f32; 3] {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn get(&self, key: PlacementKey) -> Option<&Placement> {
        self.placements.get(key)
    }

    pub fn get_mut(&mut self, key: PlacementKey) -> Option<&mut Placement> {
        self.placements.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlacementKey, &Placement)> {
        self.placements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlacementKey, &mut Placement)> {
        self.placements.iter_mut()
    }

    /// Placement cut from a grid coordinate
    pub fn key_at(&self, coord: IVec4) -> Option<PlacementKey> {
        self.by_coord.get(&coord).copied()
    }

    /// Drop the placement cut from a grid coordinate
    pub fn remove_at(&mut self, coord: IVec4) -> Option<Placement> {
        let key = self.by_coord.remove(&coord)?;
        self.placements.remove(key)
    }

    /// Take every placement out, leaving the section empty
    pub fn drain(&mut self) -> Vec<Placement> {
        self.by_coord.clear();
        self.placements.drain().map(|(_, p)| p).collect()
    }

    /// Record a renderer-side translation of the whole section
    pub fn translate(&mut self, delta: [f32; 3]) {
        for (o, d) in self.offset.iter_mut().zip(delta) {
            *o += d;
        }
    }

    /// Window index of a grid coordinate along `[right, up, forward]`
    ///
    /// Defined for any coordinate, including ones outside the window.
    pub fn local_index_of(&self, coord: IVec4) -> [i32; 3] {
        let rel = coord - self.origin;
        [
            rel.dot(self.basis.right()),
            rel.dot(self.basis.up()),
            rel.dot(self.basis.forward()),
        ]
    }

    /// Local position of a player standing at `position`
    ///
    /// The player's cell sets the horizontal placement; the fractional part of
    /// the grid Y carries over so a falling player keeps its height.
    pub fn player_local_position(&self, position: Vec4) -> [f32; 3] {
        let rounded = IVec4::round_from(position);
        let [ri, ui, fi] = self.local_index_of(rounded);
        let offset_y = position.y - rounded.y as f32;
        let cell = self.settings.cell_size;
        [
            ri as f32 * cell,
            (ui as f32 + offset_y) * cell + self.settings.eye_height,
            fi as f32 * cell,
        ]
    }

    /// Player position in renderer space, with the section's offset applied
    pub fn player_scene_position(&self, position: Vec4) -> [f32; 3] {
        let local = self.player_local_position(position);
        [
            local[0] + self.offset[0],
            local[1] + self.offset[1],
            local[2] + self.offset[2],
        ]
    }

    /// Mark the placements that should not animate during a transition
    ///
    /// A placement is instant when it lies in the plane through the player
    /// orthogonal to the horizontal axis the player is not facing along: the
    /// same right index when facing along forward, the same forward index when
    /// facing along right.
    pub fn classify_instant(&mut self, player: IVec4, facing: PivotAxis) -> usize {
        let player_index = self.local_index_of(player);
        let slot = match facing {
            PivotAxis::Forward => 0,
            PivotAxis::Right => 2,
        };
        let mut count = 0;
        for (_, placement) in self.placements.iter_mut() {
            placement.instant = placement.index[slot] == player_index[slot];
            if placement.instant {
                count += 1;
            }
        }
        count
    }

    fn insert(&mut self, placement: Placement) -> PlacementKey {
        let coord = placement.coord;
        let key = self.placements.insert(placement);
        self.by_coord.insert(coord, key);
        key
    }
}

/// Builds render sections; never mutates the grid
#[derive(Clone, Copy, Debug, Default)]
pub struct Projector {
    settings: ProjectionSettings,
}

impl Projector {
    pub fn new(settings: ProjectionSettings) -> Self {
        Self { settings }
    }

    #[inline]
    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    /// Grid coordinate of window index (0, 0, 0)
    ///
    /// The fixed axis is held at the player's coordinate and every visible
    /// axis starts at the bounds minimum. Axes walked in the negative direction
    /// start from the far side of the window instead.
    pub fn window_origin(basis: &Basis, min: IVec4, player: IVec4, world_size: i32) -> IVec4 {
        let fixed = basis.fixed();
        let mut origin = IVec4::ZERO;
        for axis in Axis::ALL {
            let value = if fixed.get(axis) != 0 { player.get(axis) } else { min.get(axis) };
            origin.set(axis, value);
        }
        for v in [basis.right(), basis.forward(), basis.up()] {
            if v.has_negative_component() {
                origin -= v * (world_size - 1);
            }
        }
        origin
    }

    /// Cut the section seen through `basis` by a player at `player_position`
    ///
    /// Coordinates outside the grid bounds contribute nothing. Instant flags
    /// are classified against the player's cell and `facing`.
    pub fn project(
        &self,
        id: SectionId,
        grid: &Grid4D,
        registry: &ContentRegistry,
        basis: &Basis,
        player_position: Vec4,
        facing: PivotAxis,
    ) -> RenderSection {
        let mut section = RenderSection::empty(id, *basis, self.settings);
        let Some(bounds) = grid.bounds() else {
            log::warn!("Projecting an empty grid");
            return section;
        };

        let player = IVec4::round_from(player_position);
        let world_size = bounds.world_size();
        let origin = Self::window_origin(basis, bounds.min, player, world_size);
        section.origin = origin;
        section.world_size = world_size;

        let oriented = Orientation::for_basis(basis);
        let cell = self.settings.cell_size;
        let (right, up, forward, _) = basis.axes();

        for ri in 0..world_size {
            for fi in 0..world_size {
                for ui in 0..world_size {
                    let coord = origin + right * ri + forward * fi + up * ui;
                    if coord == player {
                        section.player_position = Some(section.player_local_position(player_position));
                    }
                    if !bounds.contains(coord) {
                        continue;
                    }
                    let Some(cell_data) = grid.get(coord) else {
                        continue;
                    };
                    let orientation = if registry.is_symmetrical(&cell_data.content) {
                        Orientation::IDENTITY
                    } else {
                        oriented
                    };
                    section.insert(Placement {
                        coord,
                        index: [ri, ui, fi],
                        local_position: [ri as f32 * cell, ui as f32 * cell, fi as f32 * cell],
                        content: cell_data.content.clone(),
                        info_text: cell_data.info_text.clone(),
                        orientation,
                        instant: false,
                        handle: None,
                        hidden: false,
                    });
                }
            }
        }

        let instant = section.classify_instant(player, facing);
        log::debug!(
            "Projected section {:?}: {} placements ({} instant), origin {}, world size {}",
            id,
            section.len(),
            instant,
            origin,
            world_size
        );
        section
    }
}
