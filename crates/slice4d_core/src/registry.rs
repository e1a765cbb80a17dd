//! Content registry
//!
//! The renderer knows a fixed set of content identifiers. The registry records
//! them together with the gameplay role of each and whether its mesh is
//! symmetrical (and so exempt from orientation correction).

use std::collections::HashMap;

/// Gameplay role of a content identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Blocks the player and holds them up
    Solid,
    /// Purely visual
    Decoration,
    /// A light source
    Light,
    /// Picked up when the player stands on it
    Collectible,
    /// Shows its info text when stood on or looked at
    QuestionMark,
}

/// Registry entry for one content identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentDef {
    /// Gameplay role
    pub kind: ContentKind,
    /// Mesh is invariant under the section's mirroring/rotation
    pub symmetrical: bool,
}

impl ContentDef {
    pub const fn new(kind: ContentKind, symmetrical: bool) -> Self {
        Self { kind, symmetrical }
    }
}

/// Set of content identifiers the renderer can instantiate
#[derive(Clone, Debug, Default)]
pub struct ContentRegistry {
    entries: HashMap<String, ContentDef>,
}

impl ContentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The content set shipped with the game
    pub fn standard() -> Self {
        use ContentKind::*;
        let mut registry = Self::new();
        for color in ["green", "orange", "red"] {
            registry.register(format!("{color}Cube"), ContentDef::new(Solid, true));
        }
        for color in ["Green", "Orange", "Red"] {
            registry.register(format!("half{color}Cube"), ContentDef::new(Solid, false));
        }
        registry
            .with("stairs", ContentDef::new(Solid, false))
            .with("placardDoor", ContentDef::new(Solid, false))
            .with("pointLight", ContentDef::new(Light, true))
            .with("infoPoint", ContentDef::new(Decoration, true))
            .with("ground_palmtree", ContentDef::new(Decoration, false))
            .with("ground_conifer", ContentDef::new(Decoration, false))
            .with("ground_broadleaf", ContentDef::new(Decoration, false))
            .with("questionMark", ContentDef::new(QuestionMark, true))
            .with("collectible", ContentDef::new(Collectible, true))
    }

    /// Register (or replace) a content identifier
    pub fn register(&mut self, content: impl Into<String>, def: ContentDef) {
        self.entries.insert(content.into(), def);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, content: impl Into<String>, def: ContentDef) -> Self {
        self.register(content, def);
        self
    }

    /// Look up a content identifier
    pub fn get(&self, content: &str) -> Option<&ContentDef> {
        self.entries.get(content)
    }

    /// Check whether the renderer knows this identifier
    pub fn contains(&self, content: &str) -> bool {
        self.entries.contains_key(content)
    }

    /// Unknown identifiers are treated as not symmetrical
    pub fn is_symmetrical(&self, content: &str) -> bool {
        self.get(content).map(|def| def.symmetrical).unwrap_or(false)
    }

    pub fn kind(&self, content: &str) -> Option<ContentKind> {
        self.get(content).map(|def| def.kind)
    }

    /// Number of registered identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
